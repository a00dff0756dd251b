//! Segment layout: colors, label sizing and placement
//!
//! A pure function of the entry list. Safe to recompute on every frame.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::error::SpinError;
use super::segment::Segment;

/// RGBA color packed as 0xRRGGBBAA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    /// Dark purple used for text on the light segment
    pub const DARK_TEXT: Color = Color(0x6A1B_9AFF);
    /// Outline behind dark text (white, 60%)
    pub const LIGHT_OUTLINE: Color = Color(0xFFFF_FF99);
    /// Outline behind light text (black, 40%)
    pub const DARK_OUTLINE: Color = Color(0x0000_0066);

    /// CSS hex string (`#rrggbb`, or `#rrggbbaa` when not opaque)
    pub fn to_css(self) -> String {
        let rgb = self.0 >> 8;
        let alpha = self.0 & 0xFF;
        if alpha == 0xFF {
            format!("#{:06x}", rgb)
        } else {
            format!("#{:08x}", self.0)
        }
    }
}

/// Ordered segment colors, at least two
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PaletteRaw")]
pub struct Palette {
    colors: Vec<Color>,
    /// Palette slot that takes dark foreground text
    light_index: usize,
}

/// Unchecked wire form, validated through `Palette::new`
#[derive(Deserialize)]
struct PaletteRaw {
    colors: Vec<Color>,
    light_index: usize,
}

impl TryFrom<PaletteRaw> for Palette {
    type Error = SpinError;

    fn try_from(raw: PaletteRaw) -> Result<Self, Self::Error> {
        Palette::new(raw.colors, raw.light_index)
    }
}

impl Default for Palette {
    /// Purple, pink, white; white takes dark text
    fn default() -> Self {
        Self {
            colors: vec![Color(0xBE78_FEFF), Color(0xFF94_94FF), Color(0xFEFE_FEFF)],
            light_index: 2,
        }
    }
}

impl Palette {
    pub fn new(colors: Vec<Color>, light_index: usize) -> Result<Self, SpinError> {
        if colors.len() < 2 {
            return Err(SpinError::invalid(format!(
                "palette needs at least 2 colors, got {}",
                colors.len()
            )));
        }
        if light_index >= colors.len() {
            return Err(SpinError::invalid(format!(
                "light color index {} out of range for {} colors",
                light_index,
                colors.len()
            )));
        }
        Ok(Self {
            colors,
            light_index,
        })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn color(&self, index: usize) -> Color {
        self.colors[index % self.colors.len()]
    }

    pub fn light_index(&self) -> usize {
        self.light_index
    }

    /// Greedy left-to-right color assignment (palette slot per segment)
    ///
    /// Never gives neighbors `i`, `i+1` the same slot. The wrap pair
    /// (last, first) is only checked once at the end and can still collide
    /// when the palette is too small, e.g. 2 colors with an odd count.
    pub fn assign(&self, count: usize) -> Vec<usize> {
        let p = self.colors.len();
        let mut slots: Vec<usize> = Vec::with_capacity(count);
        for i in 0..count {
            if i == 0 {
                slots.push(0);
                continue;
            }
            let prev = slots[i - 1];
            let mut ci = i % p;
            if ci == prev {
                ci = (ci + 1) % p;
            }
            if i == count - 1 && count > 2 && ci == slots[0] {
                ci = (ci + 1) % p;
                if ci == prev {
                    ci = (ci + 1) % p;
                }
            }
            slots.push(ci);
        }
        slots
    }
}

/// Font size tier for a wheel with `count` entries (non-increasing in count)
pub fn font_size_for(count: usize) -> f64 {
    match count {
        0..=8 => 40.0,
        9..=16 => 32.0,
        17..=30 => 24.0,
        31..=50 => 18.0,
        51..=80 => 14.0,
        81..=120 => 11.0,
        _ => 9.0,
    }
}

/// Shorten a label so it fits the narrower segments of a crowded wheel
pub fn truncate_label(label: &str, count: usize) -> String {
    let len = label.chars().count();
    if count > 50 && len > 8 {
        format!("{}…", label.chars().take(7).collect::<String>())
    } else if count > 30 && len > 12 {
        format!("{}…", label.chars().take(11).collect::<String>())
    } else {
        label.to_string()
    }
}

/// Label anchor distance from center as a fraction of the wheel radius
#[inline]
pub fn text_radius_fraction(count: usize) -> f64 {
    if count <= 8 { 0.58 } else { 0.65 }
}

/// Radius of the dark hub disc drawn over the center
#[inline]
pub fn hub_radius(radius: f64) -> f64 {
    radius * 0.15
}

/// Everything a renderer needs to draw one segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentStyle {
    pub segment: Segment,
    /// Palette slot (stable across palettes of the same size)
    pub color_index: usize,
    pub color: Color,
    pub text_color: Color,
    pub outline_color: Color,
    pub font_size: f64,
    pub outline_width: f64,
    pub display_label: String,
    /// Label center, relative to the wheel center (screen space)
    pub anchor: DVec2,
}

/// Layout of a whole wheel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelLayout {
    pub radius: f64,
    pub segments: Vec<SegmentStyle>,
}

impl WheelLayout {
    /// Lay out `entries` on a wheel of the given radius
    pub fn compute<S: AsRef<str>>(entries: &[S], palette: &Palette, radius: f64) -> Self {
        let count = entries.len();
        if count == 0 {
            return Self {
                radius,
                segments: Vec::new(),
            };
        }

        let slots = palette.assign(count);
        let font_size = font_size_for(count);
        let outline_width = (font_size / 8.0).max(1.0);
        let text_radius = radius * text_radius_fraction(count);

        let segments = entries
            .iter()
            .zip(slots)
            .enumerate()
            .map(|(i, (entry, slot))| {
                let segment = Segment::new(i, count);
                let light = slot == palette.light_index();
                SegmentStyle {
                    segment,
                    color_index: slot,
                    color: palette.color(slot),
                    text_color: if light { Color::DARK_TEXT } else { Color::WHITE },
                    outline_color: if light {
                        Color::LIGHT_OUTLINE
                    } else {
                        Color::DARK_OUTLINE
                    },
                    font_size,
                    outline_width,
                    display_label: truncate_label(entry.as_ref(), count),
                    anchor: segment.point_on_bisector(text_radius),
                }
            })
            .collect();

        Self { radius, segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Cyclically adjacent pairs sharing a color (expected empty for 3+ colors)
    pub fn color_collisions(&self) -> Vec<(usize, usize)> {
        let n = self.segments.len();
        if n < 2 {
            return Vec::new();
        }
        let pairs = if n == 2 { 1 } else { n };
        (0..pairs)
            .map(|i| (i, (i + 1) % n))
            .filter(|&(a, b)| self.segments[a].color_index == self.segments[b].color_index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Name {}", i)).collect()
    }

    #[test]
    fn test_empty_layout() {
        let layout = WheelLayout::compute::<String>(&[], &Palette::default(), 700.0);
        assert!(layout.is_empty());
        assert!(layout.color_collisions().is_empty());
    }

    #[test]
    fn test_small_assignments() {
        let p = Palette::default();
        assert_eq!(p.assign(1), vec![0]);
        assert_eq!(p.assign(2), vec![0, 1]);
        assert_eq!(p.assign(4), vec![0, 1, 2, 1]);
        assert_eq!(p.assign(5), vec![0, 1, 2, 0, 1]);
        assert_eq!(p.assign(7), vec![0, 1, 2, 0, 1, 2, 1]);
    }

    #[test]
    fn test_three_colors_never_collide() {
        let palette = Palette::default();
        let collisions: Vec<usize> = (2..=200)
            .filter(|&n| {
                !WheelLayout::compute(&names(n), &palette, 100.0)
                    .color_collisions()
                    .is_empty()
            })
            .collect();
        assert_eq!(collisions, Vec::<usize>::new());
    }

    #[test]
    fn test_two_colors_collide_on_odd_wrap_only() {
        let palette = Palette::new(vec![Color(0x0000_00FF), Color::WHITE], 1).unwrap();
        for n in 2..=50 {
            let layout = WheelLayout::compute(&names(n), &palette, 100.0);
            let collisions = layout.color_collisions();
            if n % 2 == 1 {
                // Only the wrap pair may collide, never interior neighbors
                assert_eq!(collisions, vec![(n - 1, 0)], "n={}", n);
            } else {
                assert!(collisions.is_empty(), "n={}", n);
            }
        }
    }

    #[test]
    fn test_palette_rejects_single_color() {
        assert!(matches!(
            Palette::new(vec![Color::WHITE], 0),
            Err(SpinError::InvalidArgument(_))
        ));
        assert!(Palette::new(vec![Color::WHITE, Color::DARK_TEXT], 2).is_err());
    }

    #[test]
    fn test_font_tiers() {
        assert_eq!(font_size_for(2), 40.0);
        assert_eq!(font_size_for(8), 40.0);
        assert_eq!(font_size_for(9), 32.0);
        assert_eq!(font_size_for(16), 32.0);
        assert_eq!(font_size_for(30), 24.0);
        assert_eq!(font_size_for(50), 18.0);
        assert_eq!(font_size_for(80), 14.0);
        assert_eq!(font_size_for(120), 11.0);
        assert_eq!(font_size_for(121), 9.0);
        let sizes: Vec<f64> = (0..300).map(font_size_for).collect();
        assert!(sizes.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn test_truncation() {
        assert_eq!(truncate_label("Bartholomew", 10), "Bartholomew");
        assert_eq!(truncate_label("Bartholomew", 31), "Bartholomew");
        assert_eq!(truncate_label("Bartholomew Jones", 31), "Bartholomew…");
        assert_eq!(truncate_label("Bartholomew", 51), "Barthol…");
        assert_eq!(truncate_label("Benjamin", 51), "Benjamin");
        // Counts chars, not bytes
        assert_eq!(truncate_label("ÅÅÅÅÅÅÅÅÅ", 60), "ÅÅÅÅÅÅÅ…");
    }

    #[test]
    fn test_text_colors_follow_palette_slot() {
        let layout = WheelLayout::compute(&names(3), &Palette::default(), 100.0);
        assert_eq!(layout.segments[0].text_color, Color::WHITE);
        assert_eq!(layout.segments[1].text_color, Color::WHITE);
        assert_eq!(layout.segments[2].color_index, 2);
        assert_eq!(layout.segments[2].text_color, Color::DARK_TEXT);
        assert_eq!(layout.segments[2].outline_color, Color::LIGHT_OUTLINE);
    }

    #[test]
    fn test_anchor_radius() {
        let few = WheelLayout::compute(&names(4), &Palette::default(), 100.0);
        assert!((few.segments[0].anchor.length() - 58.0).abs() < 1e-9);
        let many = WheelLayout::compute(&names(9), &Palette::default(), 100.0);
        assert!((many.segments[3].anchor.length() - 65.0).abs() < 1e-9);
        assert_eq!(many.segments[3].outline_width, 4.0);
        assert!((hub_radius(100.0) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_palette_json_is_validated() {
        let json = serde_json::to_string(&Palette::default()).unwrap();
        let back: Palette = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Palette::default());
        let bad = r#"{"colors":[4294967295],"light_index":0}"#;
        assert!(serde_json::from_str::<Palette>(bad).is_err());
    }

    #[test]
    fn test_css() {
        assert_eq!(Color(0xBE78_FEFF).to_css(), "#be78fe");
        assert_eq!(Color::DARK_OUTLINE.to_css(), "#00000066");
    }
}
