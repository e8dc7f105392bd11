use crossterm::style::Color;

pub const COLOR_WHITE: Color = Color::Rgb {
    r: 202,
    g: 211,
    b: 245,
};
pub const COLOR_DIMMED: Color = Color::Rgb {
    r: 110,
    g: 115,
    b: 141,
};
pub const COLOR_HEADER: Color = Color::Rgb {
    r: 138,
    g: 173,
    b: 244,
};
pub const COLOR_ROW_EVEN: Color = Color::Rgb {
    r: 202,
    g: 211,
    b: 245,
};
pub const COLOR_ROW_ODD: Color = Color::Rgb {
    r: 184,
    g: 192,
    b: 224,
};
pub const COLOR_EDIT_MODE: Color = Color::Rgb {
    r: 238,
    g: 153,
    b: 16,
};
pub const COLOR_CREATE_MODE: Color = Color::Rgb {
    r: 166,
    g: 218,
    b: 149,
};
pub const COLOR_ERROR: Color = Color::Rgb {
    r: 237,
    g: 135,
    b: 150,
};
