// src/certificate/layout.rs

use chrono::NaiveDate;

use crate::{certificate::font, models::identity::Identity};

/// Logical size of the certificate, also the PDF page size.
pub const CERTIFICATE_WIDTH: u32 = 800;
pub const CERTIFICATE_HEIGHT: u32 = 600;

pub const COURSE_NAME: &str = "Formation Anti-corruption";

const MARGIN: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const WHITE: Color = Color([0xFF, 0xFF, 0xFF]);
    pub const NAVY: Color = Color([0x1E, 0x3A, 0x8A]);
    pub const GOLD: Color = Color([0xB4, 0x8A, 0x2C]);
    pub const INK: Color = Color([0x1F, 0x29, 0x37]);
    pub const MUTED: Color = Color([0x6B, 0x72, 0x80]);
}

/// A drawing primitive in logical units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// Rectangle outline `inset` units inside the page edge.
    Frame {
        inset: u32,
        thickness: u32,
        color: Color,
    },
    /// Horizontal line centered on the page.
    Rule {
        y: u32,
        width: u32,
        thickness: u32,
        color: Color,
    },
    /// Single line of text, horizontally centered, `size` units tall.
    Text {
        content: String,
        y: u32,
        size: u32,
        color: Color,
    },
}

/// What goes on the certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateDetails {
    pub recipient: String,
    pub company: String,
    pub course: String,
    pub issued_on: NaiveDate,
}

impl CertificateDetails {
    pub fn for_identity(identity: &Identity, issued_on: NaiveDate) -> Self {
        Self {
            recipient: identity.display_name().to_string(),
            company: identity.display_company().to_string(),
            course: COURSE_NAME.to_string(),
            issued_on,
        }
    }
}

/// Fixed-size certificate composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateLayout {
    pub width: u32,
    pub height: u32,
    pub background: Color,
    pub elements: Vec<Element>,
}

impl CertificateLayout {
    pub fn render(details: &CertificateDetails) -> Self {
        let issued = details.issued_on.format("%d/%m/%Y").to_string();

        let elements = vec![
            Element::Frame {
                inset: 18,
                thickness: 8,
                color: Color::NAVY,
            },
            Element::Frame {
                inset: 34,
                thickness: 2,
                color: Color::GOLD,
            },
            text("CERTIFICATE", 80, 42, Color::NAVY),
            text("OF COMPLETION", 140, 21, Color::GOLD),
            Element::Rule {
                y: 180,
                width: 320,
                thickness: 2,
                color: Color::GOLD,
            },
            text("This certifies that", 215, 14, Color::MUTED),
            text(&details.recipient, 250, 35, Color::INK),
            text(&details.company, 310, 17, Color::MUTED),
            text("has successfully completed the training", 360, 14, Color::MUTED),
            text(&details.course, 395, 24, Color::NAVY),
            Element::Rule {
                y: 470,
                width: 200,
                thickness: 1,
                color: Color::MUTED,
            },
            text(&format!("Issued on {issued}"), 490, 14, Color::INK),
        ];

        Self {
            width: CERTIFICATE_WIDTH,
            height: CERTIFICATE_HEIGHT,
            background: Color::WHITE,
            elements,
        }
    }
}

/// Text element shrunk until it fits between the margins.
fn text(content: &str, y: u32, preferred: u32, color: Color) -> Element {
    Element::Text {
        content: content.to_string(),
        y,
        size: fit_size(content, preferred, CERTIFICATE_WIDTH - 2 * MARGIN),
        color,
    }
}

/// Largest size <= `preferred` whose rendered width stays within `max_width`.
/// Never below one dot per glyph row.
pub fn fit_size(content: &str, preferred: u32, max_width: u32) -> u32 {
    let dots = font::text_dots(content);
    if dots == 0 {
        return preferred;
    }
    let max_size = max_width * font::GLYPH_HEIGHT / dots;
    preferred.min(max_size).max(font::GLYPH_HEIGHT)
}

/// Rendered width of `content` at `size`, in logical units.
pub fn text_width(content: &str, size: u32) -> u32 {
    font::text_dots(content) * size / font::GLYPH_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(name: &str) -> CertificateDetails {
        CertificateDetails {
            recipient: name.to_string(),
            company: "Acme".to_string(),
            course: COURSE_NAME.to_string(),
            issued_on: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
        }
    }

    fn texts(layout: &CertificateLayout) -> Vec<(String, u32)> {
        layout
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Text { content, size, .. } => Some((content.clone(), *size)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_layout_is_fixed_size() {
        let layout = CertificateLayout::render(&details("Jane Doe"));
        assert_eq!((layout.width, layout.height), (800, 600));
    }

    #[test]
    fn test_layout_contains_details() {
        let layout = CertificateLayout::render(&details("Jane Doe"));
        let texts: Vec<String> = texts(&layout).into_iter().map(|(t, _)| t).collect();
        assert!(texts.contains(&"Jane Doe".to_string()));
        assert!(texts.contains(&"Acme".to_string()));
        assert!(texts.contains(&COURSE_NAME.to_string()));
        assert!(texts.contains(&"Issued on 16/10/2026".to_string()));
    }

    #[test]
    fn test_long_names_shrink_to_fit() {
        let long = "Maximilian Alexander Bartholomew von Habsburg-Lothringen";
        let layout = CertificateLayout::render(&details(long));
        let (_, size) = texts(&layout).into_iter().find(|(t, _)| t == long).unwrap();
        assert!(size < 35);
        assert!(text_width(long, size) <= CERTIFICATE_WIDTH - 2 * MARGIN);
    }

    #[test]
    fn test_identity_defaults_flow_into_details() {
        let identity = Identity::new("x@y.test");
        let d = CertificateDetails::for_identity(&identity, NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
        assert_eq!(d.recipient, "Participant");
        assert_eq!(d.company, "Entreprise");
    }
}
