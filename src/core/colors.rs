use crate::core::models::MemberId;
use std::collections::HashMap;

/// High-contrast palette handed out to members in order.
pub const MEMBER_COLORS: [&str; 26] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#06B6D4", "#F97316", "#14B8A6",
    "#D946EF", "#6366F1", "#0EA5E9", "#000000", "#84CC16", "#22C55E", "#EAB308", "#DC2626", "#9333EA",
    "#BE185D", "#0891B2", "#EA580C", "#0D9488", "#C026D3", "#4F46E5", "#0284C7", "#171717",
];

/// Stable member colors for one session. Reset when a new session starts.
#[derive(Clone, Debug, Default)]
pub struct ColorCache {
    assigned: HashMap<MemberId, &'static str>,
}

impl ColorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached color, else the first unused palette color, else wraps by id.
    pub fn color_for(&mut self, member_id: MemberId) -> &'static str {
        if let Some(&color) = self.assigned.get(&member_id) {
            return color;
        }

        let color = MEMBER_COLORS
            .iter()
            .copied()
            .find(|c| !self.assigned.values().any(|used| *used == *c))
            .unwrap_or_else(|| MEMBER_COLORS[member_id.rem_euclid(MEMBER_COLORS.len() as i64) as usize]);

        self.assigned.insert(member_id, color);
        color
    }

    /// Releases the member's color for the next member that needs one.
    pub fn forget(&mut self, member_id: MemberId) {
        self.assigned.remove(&member_id);
    }

    pub fn reset(&mut self) {
        self.assigned.clear();
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

/// Black or white text, whichever reads better on `background` (`#RRGGBB`).
pub fn contrast_text_color(background: &str) -> &'static str {
    let hex = background.trim_start_matches('#');
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .map(f64::from)
            .unwrap_or(0.0)
    };

    // YIQ brightness
    let brightness = (channel(0) * 299.0 + channel(2) * 587.0 + channel(4) * 114.0) / 1000.0;
    if brightness > 128.0 { "#000000" } else { "#FFFFFF" }
}
