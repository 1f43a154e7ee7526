use std::collections::HashSet;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TileColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl TileColor {
    pub const TRANSPARENT: TileColor = TileColor { r: 0, g: 0, b: 0, a: 0 };
    pub const BLACK: TileColor = TileColor { r: 0, g: 0, b: 0, a: 255 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Accepts `RGB`, `RRGGBB` and `AARRGGBB`, with or without a leading `#`.
    /// Anything else yields opaque black.
    pub fn from_hex(hex: &str) -> Self {
        let digits: String = hex.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        let Ok(value) = u32::from_str_radix(&digits, 16) else {
            return Self::BLACK;
        };

        match digits.len() {
            3 => Self::rgb(
                ((value >> 8) & 0xF) as u8 * 17,
                ((value >> 4) & 0xF) as u8 * 17,
                (value & 0xF) as u8 * 17,
            ),
            6 => Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8),
            8 => Self {
                a: (value >> 24) as u8,
                r: (value >> 16) as u8,
                g: (value >> 8) as u8,
                b: value as u8,
            },
            _ => Self::BLACK,
        }
    }

    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

const STANDARD_HEX: [&str; 25] = [
    // vibrant
    "FF6B6B", "4ECDC4", "45B7D1", "FFA07A", "98D8C8", "F7DC6F", "BB8FCE", "85C1E2", "F8B88B", "B8E994",
    // rich
    "E74C3C", "3498DB", "2ECC71", "F39C12", "9B59B6", "1ABC9C", "E67E22", "34495E", "16A085", "C0392B",
    // pastel
    "FFB6C1", "DDA0DD", "87CEEB", "98FB98", "F0E68C",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorPalette {
    colors: Vec<TileColor>,
}

impl ColorPalette {
    pub fn new(colors: Vec<TileColor>) -> Self {
        Self { colors }
    }

    pub fn standard() -> Self {
        Self::new(STANDARD_HEX.iter().map(|hex| TileColor::from_hex(hex)).collect())
    }

    pub fn colors(&self) -> &[TileColor] {
        &self.colors
    }

    /// Distinct colors in first-seen order.
    pub fn distinct_colors(&self) -> Vec<TileColor> {
        let mut seen = HashSet::new();
        self.colors
            .iter()
            .copied()
            .filter(|color| seen.insert(*color))
            .collect()
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::standard()
    }
}
