//! Change notifications for sheets and workbooks

use crate::model::{CellValue, StyleId};
use std::fmt::Debug;
use std::sync::mpsc::{channel, Receiver, Sender};
use tracing::trace;

/// Events emitted by a sheet
#[derive(Debug, Clone, PartialEq)]
pub enum SheetEvent {
    ActiveCellChanged {
        old: Option<(usize, usize)>,
        new: (usize, usize),
    },
    CellStyleChanged {
        row: usize,
        column: usize,
        old: StyleId,
        new: StyleId,
    },
    CellValueChanged {
        row: usize,
        column: usize,
        old: CellValue,
        new: CellValue,
    },
    LayoutChanged,
    /// Rows `first..last` were added
    RowsAdded { first: usize, last: usize },
    /// Columns `first..last` were added
    ColumnsAdded { first: usize, last: usize },
    ZoomChanged { old: f32, new: f32 },
    /// Split position changed, as (row, column)
    SplitChanged {
        old: (usize, usize),
        new: (usize, usize),
    },
}

/// Events emitted by a workbook
#[derive(Debug, Clone, PartialEq)]
pub enum WorkbookEvent {
    ActiveSheetChanged { old: usize, new: usize },
    SheetAdded { index: usize },
    SheetRemoved { index: usize },
    UriChanged {
        old: Option<String>,
        new: Option<String>,
    },
}

/// Synchronous fan-out of events to channel subscribers.
#[derive(Debug)]
pub struct EventBus<E> {
    subscribers: Vec<Sender<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        EventBus {
            subscribers: Vec::new(),
        }
    }
}

impl<E: Clone + Debug> EventBus<E> {
    pub fn subscribe(&mut self) -> Receiver<E> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn has_subscribers(&self) -> bool {
        !self.subscribers.is_empty()
    }

    /// Deliver `event`; subscribers whose receiver was dropped are removed.
    pub fn emit(&mut self, event: E) {
        if self.subscribers.is_empty() {
            return;
        }
        trace!("submitting event: {:?}", event);
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_and_pruning() {
        let mut bus = EventBus::<WorkbookEvent>::default();
        let rx1 = bus.subscribe();
        let rx2 = bus.subscribe();

        bus.emit(WorkbookEvent::SheetAdded { index: 0 });
        assert_eq!(rx1.try_recv().unwrap(), WorkbookEvent::SheetAdded { index: 0 });
        assert_eq!(rx2.try_recv().unwrap(), WorkbookEvent::SheetAdded { index: 0 });

        drop(rx2);
        bus.emit(WorkbookEvent::SheetRemoved { index: 0 });
        assert_eq!(rx1.try_recv().unwrap(), WorkbookEvent::SheetRemoved { index: 0 });
        assert_eq!(bus.subscribers.len(), 1);
    }

    #[test]
    fn test_emit_without_subscribers() {
        let mut bus = EventBus::<SheetEvent>::default();
        bus.emit(SheetEvent::LayoutChanged);
        assert!(!bus.has_subscribers());
    }
}
