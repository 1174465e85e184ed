use ratatui::style::Color;

/// Nord palette with the roles querypad draws with.
pub struct NordTheme {
    // Polar Night
    pub nord0: Color, // #2E3440 - darkest background, status bar
    pub nord1: Color, // #3B4252 - highlighted suggestion
    pub nord3: Color, // #4C566A - borders of unfocused panels, hints

    // Snow Storm
    pub nord4: Color, // #D8DEE9 - body text
    pub nord6: Color, // #ECEFF4 - caret and selected text

    // Frost
    pub nord8: Color,  // #88C0D0 - focused panel border
    pub nord10: Color, // #5E81AC - selection marker

    // Aurora
    pub nord11: Color, // #BF616A - search errors
    pub nord13: Color, // #EBCB8B - no matches
    pub nord14: Color, // #A3BE8C - result count
}

impl Default for NordTheme {
    fn default() -> Self {
        Self {
            nord0: Color::Rgb(46, 52, 64),
            nord1: Color::Rgb(59, 66, 82),
            nord3: Color::Rgb(76, 86, 106),
            nord4: Color::Rgb(216, 222, 233),
            nord6: Color::Rgb(236, 239, 244),
            nord8: Color::Rgb(136, 192, 208),
            nord10: Color::Rgb(94, 129, 172),
            nord11: Color::Rgb(191, 97, 106),
            nord13: Color::Rgb(235, 203, 139),
            nord14: Color::Rgb(163, 190, 140),
        }
    }
}

impl NordTheme {
    pub fn bg(&self) -> Color {
        self.nord0
    }
    pub fn fg(&self) -> Color {
        self.nord4
    }
    pub fn muted(&self) -> Color {
        self.nord3
    }

    pub fn active_panel(&self) -> Color {
        self.nord8
    }
    pub fn inactive_panel(&self) -> Color {
        self.nord3
    }

    pub fn selection_bg(&self) -> Color {
        self.nord1
    }
    pub fn selection_fg(&self) -> Color {
        self.nord6
    }
    pub fn selection_marker(&self) -> Color {
        self.nord10
    }

    pub fn danger(&self) -> Color {
        self.nord11
    }
    pub fn warning(&self) -> Color {
        self.nord13
    }
    pub fn success(&self) -> Color {
        self.nord14
    }
}
