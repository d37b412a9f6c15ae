use crate::core::colors::{ColorCache, MEMBER_COLORS, contrast_text_color};

#[test]
fn test_colors_are_handed_out_in_palette_order() {
    let mut colors = ColorCache::new();

    assert_eq!(colors.color_for(10), MEMBER_COLORS[0]);
    assert_eq!(colors.color_for(4), MEMBER_COLORS[1]);
    assert_eq!(colors.color_for(10), MEMBER_COLORS[0]);
    assert_eq!(colors.len(), 2);
}

#[test]
fn test_exhausted_palette_wraps_by_id() {
    let mut colors = ColorCache::new();
    for id in 0..MEMBER_COLORS.len() as i64 {
        colors.color_for(id);
    }

    assert_eq!(colors.color_for(30), MEMBER_COLORS[30 % MEMBER_COLORS.len()]);
}

#[test]
fn test_reset_forgets_assignments() {
    let mut colors = ColorCache::new();
    colors.color_for(5);
    colors.color_for(6);
    colors.reset();

    assert!(colors.is_empty());
    assert_eq!(colors.color_for(6), MEMBER_COLORS[0]);
}

#[test]
fn test_forgotten_color_is_reused() {
    let mut colors = ColorCache::new();
    for id in 0..MEMBER_COLORS.len() as i64 {
        colors.color_for(id);
    }
    colors.forget(3);

    assert_eq!(colors.len(), MEMBER_COLORS.len() - 1);
    assert_eq!(colors.color_for(40), MEMBER_COLORS[3]);
}

#[test]
fn test_contrast_text_color() {
    assert_eq!(contrast_text_color("#FFFFFF"), "#000000");
    assert_eq!(contrast_text_color("#000000"), "#FFFFFF");
    assert_eq!(contrast_text_color("#F59E0B"), "#000000");
    assert_eq!(contrast_text_color("#4F46E5"), "#FFFFFF");
}
