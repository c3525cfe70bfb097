//! ARGB colours and the named colour palette

use crate::error::{MejaError, MejaResult};
use std::fmt;
use std::str::FromStr;

const F_BRIGHTEN: f64 = 0.7;

/// A colour stored as 32-bit ARGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

#[rustfmt::skip]
impl Color {
    pub const BLACK: Color = Color(0xFF000000);
    pub const SILVER: Color = Color(0xFFC0C0C0);
    pub const GRAY: Color = Color(0xFF808080);
    pub const WHITE: Color = Color(0xFFFFFFFF);
    pub const MAROON: Color = Color(0xFF800000);
    pub const RED: Color = Color(0xFFFF0000);
    pub const PURPLE: Color = Color(0xFF800080);
    pub const FUCHSIA: Color = Color(0xFFFF00FF);
    pub const GREEN: Color = Color(0xFF008000);
    pub const LIME: Color = Color(0xFF00FF00);
    pub const OLIVE: Color = Color(0xFF808000);
    pub const YELLOW: Color = Color(0xFFFFFF00);
    pub const NAVY: Color = Color(0xFF000080);
    pub const BLUE: Color = Color(0xFF0000FF);
    pub const TEAL: Color = Color(0xFF008080);
    pub const AQUA: Color = Color(0xFF00FFFF);
    pub const ORANGE: Color = Color(0xFFFFA500);
    pub const ALICEBLUE: Color = Color(0xFFF0F8FF);
    pub const ANTIQUEWHITE: Color = Color(0xFFFAEBD7);
    pub const AQUAMARINE: Color = Color(0xFF7FFFD4);
    pub const AZURE: Color = Color(0xFFF0FFFF);
    pub const BEIGE: Color = Color(0xFFF5F5DC);
    pub const BISQUE: Color = Color(0xFFFFE4C4);
    pub const BLANCHEDALMOND: Color = Color(0xFFFFE4C4);
    pub const BLUEVIOLET: Color = Color(0xFF8A2BE2);
    pub const BROWN: Color = Color(0xFFA52A2A);
    pub const BURLYWOOD: Color = Color(0xFFDEB887);
    pub const CADETBLUE: Color = Color(0xFF5F9EA0);
    pub const CHARTREUSE: Color = Color(0xFF7FFF00);
    pub const CHOCOLATE: Color = Color(0xFFD2691E);
    pub const CORAL: Color = Color(0xFFFF7F50);
    pub const CORNFLOWERBLUE: Color = Color(0xFF6495ED);
    pub const CORNSILK: Color = Color(0xFFFFF8DC);
    pub const CRIMSON: Color = Color(0xFFDC143C);
    pub const DARKBLUE: Color = Color(0xFF00008B);
    pub const DARKCYAN: Color = Color(0xFF008B8B);
    pub const DARKGOLDENROD: Color = Color(0xFFB8860B);
    pub const DARKGRAY: Color = Color(0xFFA9A9A9);
    pub const DARKGREEN: Color = Color(0xFF006400);
    pub const DARKGREY: Color = Color(0xFFA9A9A9);
    pub const DARKKHAKI: Color = Color(0xFFBDB76B);
    pub const DARKMAGENTA: Color = Color(0xFF8B008B);
    pub const DARKOLIVEGREEN: Color = Color(0xFF556B2F);
    pub const DARKORANGE: Color = Color(0xFFFF8C00);
    pub const DARKORCHID: Color = Color(0xFF9932CC);
    pub const DARKRED: Color = Color(0xFF8B0000);
    pub const DARKSALMON: Color = Color(0xFFE9967A);
    pub const DARKSEAGREEN: Color = Color(0xFF8FBC8F);
    pub const DARKSLATEBLUE: Color = Color(0xFF483D8B);
    pub const DARKSLATEGRAY: Color = Color(0xFF2F4F4F);
    pub const DARKSLATEGREY: Color = Color(0xFF2F4F4F);
    pub const DARKTURQUOISE: Color = Color(0xFF00CED1);
    pub const DARKVIOLET: Color = Color(0xFF9400D3);
    pub const DEEPPINK: Color = Color(0xFFFF1493);
    pub const DEEPSKYBLUE: Color = Color(0xFF00BFFF);
    pub const DIMGRAY: Color = Color(0xFF696969);
    pub const DIMGREY: Color = Color(0xFF696969);
    pub const DODGERBLUE: Color = Color(0xFF1E90FF);
    pub const FIREBRICK: Color = Color(0xFFB22222);
    pub const FLORALWHITE: Color = Color(0xFFFFFAF0);
    pub const FORESTGREEN: Color = Color(0xFF228B22);
    pub const GAINSBORO: Color = Color(0xFFDCDCDC);
    pub const GHOSTWHITE: Color = Color(0xFFF8F8FF);
    pub const GOLD: Color = Color(0xFFFFD700);
    pub const GOLDENROD: Color = Color(0xFFDAA520);
    pub const GREENYELLOW: Color = Color(0xFFADFF2F);
    pub const GREY: Color = Color(0xFF808080);
    pub const HONEYDEW: Color = Color(0xFFF0FFF0);
    pub const HOTPINK: Color = Color(0xFFFF69B4);
    pub const INDIANRED: Color = Color(0xFFCD5C5C);
    pub const INDIGO: Color = Color(0xFF4B0082);
    pub const IVORY: Color = Color(0xFFFFFFF0);
    pub const KHAKI: Color = Color(0xFFF0E68C);
    pub const LAVENDER: Color = Color(0xFFE6E6FA);
    pub const LAVENDERBLUSH: Color = Color(0xFFFFF0F5);
    pub const LAWNGREEN: Color = Color(0xFF7CFC00);
    pub const LEMONCHIFFON: Color = Color(0xFFFFFACD);
    pub const LIGHTBLUE: Color = Color(0xFFADD8E6);
    pub const LIGHTCORAL: Color = Color(0xFFF08080);
    pub const LIGHTCYAN: Color = Color(0xFFE0FFFF);
    pub const LIGHTGOLDENRODYELLOW: Color = Color(0xFFFAFAD2);
    pub const LIGHTGRAY: Color = Color(0xFFD3D3D3);
    pub const LIGHTGREEN: Color = Color(0xFF90EE90);
    pub const LIGHTGREY: Color = Color(0xFFD3D3D3);
    pub const LIGHTPINK: Color = Color(0xFFFFB6C1);
    pub const LIGHTSALMON: Color = Color(0xFFFFA07A);
    pub const LIGHTSEAGREEN: Color = Color(0xFF20B2AA);
    pub const LIGHTSKYBLUE: Color = Color(0xFF87CEFA);
    pub const LIGHTSLATEGRAY: Color = Color(0xFF778899);
    pub const LIGHTSLATEGREY: Color = Color(0xFF778899);
    pub const LIGHTSTEELBLUE: Color = Color(0xFFB0C4DE);
    pub const LIGHTYELLOW: Color = Color(0xFFFFFFE0);
    pub const LIMEGREEN: Color = Color(0xFF32CD32);
    pub const LINEN: Color = Color(0xFFFAF0E6);
    pub const MEDIUMAQUAMARINE: Color = Color(0xFF66CDAA);
    pub const MEDIUMBLUE: Color = Color(0xFF0000CD);
    pub const MEDIUMORCHID: Color = Color(0xFFBA55D3);
    pub const MEDIUMPURPLE: Color = Color(0xFF9370DB);
    pub const MEDIUMSEAGREEN: Color = Color(0xFF3CB371);
    pub const MEDIUMSLATEBLUE: Color = Color(0xFF7B68EE);
    pub const MEDIUMSPRINGGREEN: Color = Color(0xFF00FA9A);
    pub const MEDIUMTURQUOISE: Color = Color(0xFF48D1CC);
    pub const MEDIUMVIOLETRED: Color = Color(0xFFC71585);
    pub const MIDNIGHTBLUE: Color = Color(0xFF191970);
    pub const MINTCREAM: Color = Color(0xFFF5FFFA);
    pub const MISTYROSE: Color = Color(0xFFFFE4E1);
    pub const MOCCASIN: Color = Color(0xFFFFE4B5);
    pub const NAVAJOWHITE: Color = Color(0xFFFFDEAD);
    pub const OLDLACE: Color = Color(0xFFFDF5E6);
    pub const OLIVEDRAB: Color = Color(0xFF6B8E23);
    pub const ORANGERED: Color = Color(0xFFFF4500);
    pub const ORCHID: Color = Color(0xFFDA70D6);
    pub const PALEGOLDENROD: Color = Color(0xFFEEE8AA);
    pub const PALEGREEN: Color = Color(0xFF98FB98);
    pub const PALETURQUOISE: Color = Color(0xFFAFEEEE);
    pub const PALEVIOLETRED: Color = Color(0xFFDB7093);
    pub const PAPAYAWHIP: Color = Color(0xFFFFEFD5);
    pub const PEACHPUFF: Color = Color(0xFFFFDAB9);
    pub const PERU: Color = Color(0xFFCD853F);
    pub const PINK: Color = Color(0xFFFFC0CB);
    pub const PLUM: Color = Color(0xFFDDA0DD);
    pub const POWDERBLUE: Color = Color(0xFFB0E0E6);
    pub const ROSYBROWN: Color = Color(0xFFBC8F8F);
    pub const ROYALBLUE: Color = Color(0xFF4169E1);
    pub const SADDLEBROWN: Color = Color(0xFF8B4513);
    pub const SALMON: Color = Color(0xFFFA8072);
    pub const SANDYBROWN: Color = Color(0xFFF4A460);
    pub const SEAGREEN: Color = Color(0xFF2E8B57);
    pub const SEASHELL: Color = Color(0xFFFFF5EE);
    pub const SIENNA: Color = Color(0xFFA0522D);
    pub const SKYBLUE: Color = Color(0xFF87CEEB);
    pub const SLATEBLUE: Color = Color(0xFF6A5ACD);
    pub const SLATEGRAY: Color = Color(0xFF708090);
    pub const SLATEGREY: Color = Color(0xFF708090);
    pub const SNOW: Color = Color(0xFFFFFAFA);
    pub const SPRINGGREEN: Color = Color(0xFF00FF7F);
    pub const STEELBLUE: Color = Color(0xFF4682B4);
    pub const TAN: Color = Color(0xFFD2B48C);
    pub const THISTLE: Color = Color(0xFFD8BFD8);
    pub const TOMATO: Color = Color(0xFFFF6347);
    pub const TURQUOISE: Color = Color(0xFF40E0D0);
    pub const VIOLET: Color = Color(0xFFEE82EE);
    pub const WHEAT: Color = Color(0xFFF5DEB3);
    pub const WHITESMOKE: Color = Color(0xFFF5F5F5);
    pub const YELLOWGREEN: Color = Color(0xFF9ACD32);
    pub const REBECCAPURPLE: Color = Color(0xFF663399);
    pub const TRANSPARENT_WHITE: Color = Color(0x00FFFFFF);
}

/// Named colours in registration order.
#[rustfmt::skip]
pub const PALETTE: &[(&str, Color)] = &[
    ("BLACK", Color::BLACK),
    ("SILVER", Color::SILVER),
    ("GRAY", Color::GRAY),
    ("WHITE", Color::WHITE),
    ("MAROON", Color::MAROON),
    ("RED", Color::RED),
    ("PURPLE", Color::PURPLE),
    ("FUCHSIA", Color::FUCHSIA),
    ("GREEN", Color::GREEN),
    ("LIME", Color::LIME),
    ("OLIVE", Color::OLIVE),
    ("YELLOW", Color::YELLOW),
    ("NAVY", Color::NAVY),
    ("BLUE", Color::BLUE),
    ("TEAL", Color::TEAL),
    ("AQUA", Color::AQUA),
    ("ORANGE", Color::ORANGE),
    ("ALICEBLUE", Color::ALICEBLUE),
    ("ANTIQUEWHITE", Color::ANTIQUEWHITE),
    ("AQUAMARINE", Color::AQUAMARINE),
    ("AZURE", Color::AZURE),
    ("BEIGE", Color::BEIGE),
    ("BISQUE", Color::BISQUE),
    ("BLANCHEDALMOND", Color::BLANCHEDALMOND),
    ("BLUEVIOLET", Color::BLUEVIOLET),
    ("BROWN", Color::BROWN),
    ("BURLYWOOD", Color::BURLYWOOD),
    ("CADETBLUE", Color::CADETBLUE),
    ("CHARTREUSE", Color::CHARTREUSE),
    ("CHOCOLATE", Color::CHOCOLATE),
    ("CORAL", Color::CORAL),
    ("CORNFLOWERBLUE", Color::CORNFLOWERBLUE),
    ("CORNSILK", Color::CORNSILK),
    ("CRIMSON", Color::CRIMSON),
    ("DARKBLUE", Color::DARKBLUE),
    ("DARKCYAN", Color::DARKCYAN),
    ("DARKGOLDENROD", Color::DARKGOLDENROD),
    ("DARKGRAY", Color::DARKGRAY),
    ("DARKGREEN", Color::DARKGREEN),
    ("DARKGREY", Color::DARKGREY),
    ("DARKKHAKI", Color::DARKKHAKI),
    ("DARKMAGENTA", Color::DARKMAGENTA),
    ("DARKOLIVEGREEN", Color::DARKOLIVEGREEN),
    ("DARKORANGE", Color::DARKORANGE),
    ("DARKORCHID", Color::DARKORCHID),
    ("DARKRED", Color::DARKRED),
    ("DARKSALMON", Color::DARKSALMON),
    ("DARKSEAGREEN", Color::DARKSEAGREEN),
    ("DARKSLATEBLUE", Color::DARKSLATEBLUE),
    ("DARKSLATEGRAY", Color::DARKSLATEGRAY),
    ("DARKSLATEGREY", Color::DARKSLATEGREY),
    ("DARKTURQUOISE", Color::DARKTURQUOISE),
    ("DARKVIOLET", Color::DARKVIOLET),
    ("DEEPPINK", Color::DEEPPINK),
    ("DEEPSKYBLUE", Color::DEEPSKYBLUE),
    ("DIMGRAY", Color::DIMGRAY),
    ("DIMGREY", Color::DIMGREY),
    ("DODGERBLUE", Color::DODGERBLUE),
    ("FIREBRICK", Color::FIREBRICK),
    ("FLORALWHITE", Color::FLORALWHITE),
    ("FORESTGREEN", Color::FORESTGREEN),
    ("GAINSBORO", Color::GAINSBORO),
    ("GHOSTWHITE", Color::GHOSTWHITE),
    ("GOLD", Color::GOLD),
    ("GOLDENROD", Color::GOLDENROD),
    ("GREENYELLOW", Color::GREENYELLOW),
    ("GREY", Color::GREY),
    ("HONEYDEW", Color::HONEYDEW),
    ("HOTPINK", Color::HOTPINK),
    ("INDIANRED", Color::INDIANRED),
    ("INDIGO", Color::INDIGO),
    ("IVORY", Color::IVORY),
    ("KHAKI", Color::KHAKI),
    ("LAVENDER", Color::LAVENDER),
    ("LAVENDERBLUSH", Color::LAVENDERBLUSH),
    ("LAWNGREEN", Color::LAWNGREEN),
    ("LEMONCHIFFON", Color::LEMONCHIFFON),
    ("LIGHTBLUE", Color::LIGHTBLUE),
    ("LIGHTCORAL", Color::LIGHTCORAL),
    ("LIGHTCYAN", Color::LIGHTCYAN),
    ("LIGHTGOLDENRODYELLOW", Color::LIGHTGOLDENRODYELLOW),
    ("LIGHTGRAY", Color::LIGHTGRAY),
    ("LIGHTGREEN", Color::LIGHTGREEN),
    ("LIGHTGREY", Color::LIGHTGREY),
    ("LIGHTPINK", Color::LIGHTPINK),
    ("LIGHTSALMON", Color::LIGHTSALMON),
    ("LIGHTSEAGREEN", Color::LIGHTSEAGREEN),
    ("LIGHTSKYBLUE", Color::LIGHTSKYBLUE),
    ("LIGHTSLATEGRAY", Color::LIGHTSLATEGRAY),
    ("LIGHTSLATEGREY", Color::LIGHTSLATEGREY),
    ("LIGHTSTEELBLUE", Color::LIGHTSTEELBLUE),
    ("LIGHTYELLOW", Color::LIGHTYELLOW),
    ("LIMEGREEN", Color::LIMEGREEN),
    ("LINEN", Color::LINEN),
    ("MEDIUMAQUAMARINE", Color::MEDIUMAQUAMARINE),
    ("MEDIUMBLUE", Color::MEDIUMBLUE),
    ("MEDIUMORCHID", Color::MEDIUMORCHID),
    ("MEDIUMPURPLE", Color::MEDIUMPURPLE),
    ("MEDIUMSEAGREEN", Color::MEDIUMSEAGREEN),
    ("MEDIUMSLATEBLUE", Color::MEDIUMSLATEBLUE),
    ("MEDIUMSPRINGGREEN", Color::MEDIUMSPRINGGREEN),
    ("MEDIUMTURQUOISE", Color::MEDIUMTURQUOISE),
    ("MEDIUMVIOLETRED", Color::MEDIUMVIOLETRED),
    ("MIDNIGHTBLUE", Color::MIDNIGHTBLUE),
    ("MINTCREAM", Color::MINTCREAM),
    ("MISTYROSE", Color::MISTYROSE),
    ("MOCCASIN", Color::MOCCASIN),
    ("NAVAJOWHITE", Color::NAVAJOWHITE),
    ("OLDLACE", Color::OLDLACE),
    ("OLIVEDRAB", Color::OLIVEDRAB),
    ("ORANGERED", Color::ORANGERED),
    ("ORCHID", Color::ORCHID),
    ("PALEGOLDENROD", Color::PALEGOLDENROD),
    ("PALEGREEN", Color::PALEGREEN),
    ("PALETURQUOISE", Color::PALETURQUOISE),
    ("PALEVIOLETRED", Color::PALEVIOLETRED),
    ("PAPAYAWHIP", Color::PAPAYAWHIP),
    ("PEACHPUFF", Color::PEACHPUFF),
    ("PERU", Color::PERU),
    ("PINK", Color::PINK),
    ("PLUM", Color::PLUM),
    ("POWDERBLUE", Color::POWDERBLUE),
    ("ROSYBROWN", Color::ROSYBROWN),
    ("ROYALBLUE", Color::ROYALBLUE),
    ("SADDLEBROWN", Color::SADDLEBROWN),
    ("SALMON", Color::SALMON),
    ("SANDYBROWN", Color::SANDYBROWN),
    ("SEAGREEN", Color::SEAGREEN),
    ("SEASHELL", Color::SEASHELL),
    ("SIENNA", Color::SIENNA),
    ("SKYBLUE", Color::SKYBLUE),
    ("SLATEBLUE", Color::SLATEBLUE),
    ("SLATEGRAY", Color::SLATEGRAY),
    ("SLATEGREY", Color::SLATEGREY),
    ("SNOW", Color::SNOW),
    ("SPRINGGREEN", Color::SPRINGGREEN),
    ("STEELBLUE", Color::STEELBLUE),
    ("TAN", Color::TAN),
    ("THISTLE", Color::THISTLE),
    ("TOMATO", Color::TOMATO),
    ("TURQUOISE", Color::TURQUOISE),
    ("VIOLET", Color::VIOLET),
    ("WHEAT", Color::WHEAT),
    ("WHITESMOKE", Color::WHITESMOKE),
    ("YELLOWGREEN", Color::YELLOWGREEN),
    ("REBECCAPURPLE", Color::REBECCAPURPLE),
];

impl Color {
    pub const fn from_argb(argb: u32) -> Self {
        Color(argb)
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    pub fn argb(&self) -> u32 {
        self.0
    }

    pub fn a(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn r(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn g(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn b(&self) -> u8 {
        self.0 as u8
    }

    pub fn is_opaque(&self) -> bool {
        self.a() == 255
    }

    pub fn is_transparent(&self) -> bool {
        self.a() == 0
    }

    /// Lookup a palette colour by name, ignoring case.
    pub fn named(name: &str) -> Option<Color> {
        PALETTE
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, c)| *c)
    }

    pub fn brighter(&self) -> Color {
        let (mut r, mut g, mut b) = (self.r() as i32, self.g() as i32, self.b() as i32);
        let i = (1.0 / (1.0 - F_BRIGHTEN)) as i32;
        if r == 0 && g == 0 && b == 0 {
            return Color::rgba(i as u8, i as u8, i as u8, self.a());
        }
        if r > 0 && r < i {
            r = i;
        }
        if g > 0 && g < i {
            g = i;
        }
        if b > 0 && b < i {
            b = i;
        }
        let scale = |v: i32| ((v as f64 / F_BRIGHTEN) as i32).min(255) as u8;
        Color::rgba(scale(r), scale(g), scale(b), self.a())
    }

    pub fn darker(&self) -> Color {
        let scale = |v: u8| ((v as f64 * F_BRIGHTEN) as i32).max(0) as u8;
        Color::rgba(scale(self.r()), scale(self.g()), scale(self.b()), self.a())
    }

    /// CSS colour value: `#rrggbb` when opaque, `rgba(...)` otherwise.
    pub fn to_css(&self) -> String {
        if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())
        } else {
            format!(
                "rgba({},{},{},{})",
                self.r(),
                self.g(),
                self.b(),
                self.a() as f32 / 255.0
            )
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

fn parse_component(s: &str, text: &str) -> MejaResult<u8> {
    s.trim()
        .parse::<u8>()
        .map_err(|_| MejaError::Argument(format!("Cannot parse \"{}\" as color.", text)))
}

fn parse_components(args: &str, text: &str, n: usize) -> MejaResult<Vec<String>> {
    let inner = args
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| MejaError::Argument(format!("Cannot parse \"{}\" as color.", text)))?;
    let parts: Vec<String> = inner.split(',').map(|p| p.trim().to_string()).collect();
    if parts.len() != n {
        return Err(MejaError::Argument(format!(
            "Cannot parse \"{}\" as color.",
            text
        )));
    }
    Ok(parts)
}

impl FromStr for Color {
    type Err = MejaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(color) = Color::named(s) {
            return Ok(color);
        }

        if let Some(hex) = s.strip_prefix('#') {
            let v = u32::from_str_radix(hex, 16)
                .map_err(|_| MejaError::Argument(format!("\"{}\" is no valid color.", s)))?;
            return match hex.len() {
                6 => Ok(Color(0xFF00_0000 | v)),
                8 => Ok(Color(v)),
                _ => Err(MejaError::Argument(format!("\"{}\" is no valid color.", s))),
            };
        }

        if let Some(args) = s.strip_prefix("rgba") {
            let parts = parse_components(args, s, 4)?;
            let alpha: f32 = parts[3]
                .parse()
                .map_err(|_| MejaError::Argument(format!("Cannot parse \"{}\" as color.", s)))?;
            return Ok(Color::rgba(
                parse_component(&parts[0], s)?,
                parse_component(&parts[1], s)?,
                parse_component(&parts[2], s)?,
                (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ));
        }

        if let Some(args) = s.strip_prefix("rgb") {
            let parts = parse_components(args, s, 3)?;
            return Ok(Color::rgb(
                parse_component(&parts[0], s)?,
                parse_component(&parts[1], s)?,
                parse_component(&parts[2], s)?,
            ));
        }

        Err(MejaError::Argument(format!("\"{}\" is no valid color.", s)))
    }
}
