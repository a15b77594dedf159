//! HTML/SVG rendering of the toggle icon

use crate::visual::VisualParameterSet;
use html_escape::{encode_double_quoted_attribute, encode_text};

/// Sun rays as (x1, y1, x2, y2) in the 24x24 icon box
const RAYS: [(f32, f32, f32, f32); 8] = [
    (12.0, 1.0, 12.0, 3.0),
    (12.0, 21.0, 12.0, 23.0),
    (4.22, 4.22, 5.64, 5.64),
    (18.36, 18.36, 19.78, 19.78),
    (1.0, 12.0, 3.0, 12.0),
    (21.0, 12.0, 23.0, 12.0),
    (4.22, 19.78, 5.64, 18.36),
    (18.36, 5.64, 19.78, 4.22),
];

/// Everything needed to render one toggle frame
#[derive(Clone, Debug)]
pub struct ToggleMarkup<'a> {
    pub frame: VisualParameterSet,
    pub mask_id: &'a str,
    pub label: &'a str,
    /// "auto", "light" or "dark", exposed as `data-mode`
    pub mode: &'a str,
}

impl ToggleMarkup<'_> {
    /// Render the control: a button holding the hidden label and the icon
    pub fn render(&self) -> String {
        let f = &self.frame;
        let mask_id = encode_double_quoted_attribute(self.mask_id);
        let mut out = String::with_capacity(1024);

        out.push_str(&format!(
            "<button type=\"button\" class=\"theme-toggle\" data-mode=\"{}\">",
            encode_double_quoted_attribute(self.mode)
        ));
        out.push_str(&format!(
            "<span class=\"sr-only\">{}</span>",
            encode_text(self.label)
        ));
        out.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"24\" height=\"24\" \
             viewBox=\"0 0 24 24\" fill=\"none\" stroke-width=\"2\" stroke-linecap=\"round\" \
             stroke-linejoin=\"round\" stroke=\"currentColor\" aria-hidden=\"true\" \
             style=\"cursor: pointer; transform: rotate({}deg)\">",
            num(f.rotation)
        ));
        out.push_str(&format!(
            "<mask id=\"{}\"><rect x=\"0\" y=\"0\" width=\"100%\" height=\"100%\" fill=\"white\"/>\
             <circle cx=\"{}%\" cy=\"{}%\" r=\"9\" fill=\"black\"/></mask>",
            mask_id,
            num(f.mask_center.0),
            num(f.mask_center.1)
        ));
        out.push_str(&format!(
            "<circle cx=\"12\" cy=\"12\" r=\"{}\" fill=\"currentColor\" mask=\"url(#{})\"/>",
            num(f.orb_radius.max(0.0)),
            mask_id
        ));
        out.push_str(&format!(
            "<g stroke=\"currentColor\" opacity=\"{}\">",
            num(f.ray_opacity.clamp(0.0, 1.0))
        ));
        for (x1, y1, x2, y2) in RAYS {
            out.push_str(&format!(
                "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"/>",
                num(x1),
                num(y1),
                num(x2),
                num(y2)
            ));
        }
        out.push_str("</g></svg></button>");
        out
    }
}

/// Format a number with at most three decimals and no trailing zeros
pub(crate) fn num(value: f32) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // Avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{:.3}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
