use vellum_core::banner::{
    BannerEvent, fold_banner_style, parse_banner_config, render_banner,
};

fn render(config: &str, title: &str, subtitle: &str) -> String {
    let (events, _) = parse_banner_config(config);
    let (style, _) = fold_banner_style(&events);
    render_banner(&style, title, subtitle).svg
}

#[test]
fn radial_gradient_carries_aspect_compensation() {
    let svg = render("back.radial red blue\naspect 5.0\n", "Demo", "");
    assert!(
        svg.contains("gradientTransform=\"scale(0.2,1)\""),
        "compensation should default to 1/aspect: {svg}"
    );
    assert!(svg.contains("viewBox=\"0 0 800 160\""));
}

#[test]
fn explicit_coordinates_beat_alignment_in_the_artifact() {
    let svg = render(
        "title.align right\ntitle.xy 700 60\nsubtitle.align center\n",
        "Demo",
        "Tagline",
    );
    assert!(svg.contains("id=\"banner-title\" x=\"700\" y=\"60\""));
    // the subtitle keeps its align-derived center position
    assert!(svg.contains("id=\"banner-subtitle\" x=\"50%\""));
}

#[test]
fn directive_replay_is_order_insensitive_for_xy_precedence() {
    let first = render("title.xy 10 20\ntitle.align center\n", "Demo", "");
    let second = render("title.align center\ntitle.xy 10 20\n", "Demo", "");
    assert_eq!(first, second);
}

#[test]
fn event_parse_is_pure_and_replayable() {
    let config = "back.linear #101820 #2c5364 tb\ntitle.scale 2\n";
    let (events, diags) = parse_banner_config(config);
    assert!(diags.is_empty());
    assert_eq!(events.len(), 2);
    assert!(matches!(events[1], BannerEvent::Scale(_, scale) if scale == 2.0));

    // folding the same events twice yields the same style
    let (style_a, _) = fold_banner_style(&events);
    let (style_b, _) = fold_banner_style(&events);
    assert_eq!(style_a, style_b);
    assert_eq!(
        render_banner(&style_a, "Demo", "").svg,
        render_banner(&style_b, "Demo", "").svg
    );
}

#[test]
fn banner_text_is_escaped() {
    let svg = render("", "Tom & Jerry <live>", "");
    assert!(svg.contains("Tom &amp; Jerry &lt;live&gt;"));
}
