//! Canonical layout arithmetic.
//!
//! Every constant the height estimator uses is also the constant the rect
//! renderer advances by. The estimator's contract is exact equality with the
//! renderer's consumed extent, so there is exactly one table of numbers and
//! both sides compute through it.

/// Layout constants shared by the height estimator and the rect renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// Height of one standard field line.
    pub line: f32,
    /// Vertical gap after each drawn element.
    pub spacing: f32,
    /// Width reserved for field labels in rect mode.
    pub label_width: f32,
    /// Extra gap under the tab strip.
    pub tab_extra: f32,
    /// Height of the required/constraint banner.
    pub banner: f32,
    /// Height of the asset-list load button.
    pub asset_button: f32,
    /// Lead-in above an inline-expanded child block.
    pub inline_lead: f32,
    /// Indent applied to inline-expanded children.
    pub indent: f32,
    /// Gap above the action-button block.
    pub actions_gap: f32,
    /// Height of one action button.
    pub button_height: f32,
    /// Padding added once per rendered tab.
    pub tab_padding: f32,
    /// Thickness of a title separator rule.
    pub rule: f32,
    /// Width of one color-preset swatch button.
    pub swatch_width: f32,
    /// Width of a suffix unit label.
    pub suffix_width: f32,
    /// Width of inline pick/load/browse buttons.
    pub side_button_width: f32,
    /// Horizontal gap between members of a horizontal run.
    pub run_gap: f32,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            line: 18.0,
            spacing: 2.0,
            label_width: 140.0,
            tab_extra: 4.0,
            banner: 30.0,
            asset_button: 18.0,
            inline_lead: 6.0,
            indent: 15.0,
            actions_gap: 6.0,
            button_height: 25.0,
            tab_padding: 10.0,
            rule: 1.0,
            swatch_width: 50.0,
            suffix_width: 30.0,
            side_button_width: 60.0,
            run_gap: 4.0,
        }
    }
}

impl Metrics {
    /// Vertical extent of the tab strip (strip line plus its gap).
    pub fn tab_strip(&self) -> f32 {
        self.line + self.tab_extra
    }

    /// Vertical extent of a box group header.
    pub fn box_header(&self) -> f32 {
        self.line + self.spacing
    }

    /// Vertical extent of a title block.
    pub fn title(&self, ruled: bool) -> f32 {
        let mut height = self.line + self.spacing;
        if ruled {
            height += self.rule + self.spacing;
        }
        height
    }

    /// Vertical extent reserved for a warning banner.
    pub fn banner_advance(&self) -> f32 {
        self.banner + self.spacing
    }

    /// Vertical extent reserved for the asset-list load button.
    pub fn asset_button_advance(&self) -> f32 {
        self.asset_button + self.spacing
    }
}
