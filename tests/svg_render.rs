use wordcloud::{
    CanvasSize, CloudConfig, CloudRenderer, SpiralLayout, SvgOptions, Theme, parse_svg,
    rasterize_svg, write_png,
};

fn ready_renderer(theme: Theme) -> CloudRenderer {
    let cfg = CloudConfig {
        seed: Some(3),
        theme,
        ..CloudConfig::default()
    };
    let mut r = CloudRenderer::new(cfg, CanvasSize::default(), SpiralLayout::default()).unwrap();
    r.question_changed("Favourite colour?");
    r.words_received(["red", "blue", "red", "red", "green", "<b>&"]);
    assert!(r.poll());
    r
}

fn out_dir() -> std::path::PathBuf {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("svg_render");
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn animated_and_static_scene_svg_both_parse() {
    let r = ready_renderer(Theme::Light);
    for animated in [true, false] {
        let svg = r.to_svg(SvgOptions { animated });
        let tree = parse_svg(&svg).unwrap();
        assert_eq!(tree.size().width(), 500.0);
        assert_eq!(tree.size().height(), 300.0);
        assert_eq!(svg.contains("<style>"), animated);
    }
}

#[test]
fn markup_in_responses_is_escaped() {
    let r = ready_renderer(Theme::Light);
    let svg = r.to_svg(SvgOptions::default());
    assert!(r.scene().unwrap().node("<b>&").is_some());
    assert!(svg.contains("&lt;b&gt;&amp;"));
    assert!(!svg.contains("<b>"));
}

#[test]
fn control_characters_in_responses_keep_svg_valid() {
    let mut r = CloudRenderer::new(
        CloudConfig {
            seed: Some(3),
            ..CloudConfig::default()
        },
        CanvasSize::default(),
        SpiralLayout::default(),
    )
    .unwrap();
    assert!(wordcloud::validate_response("bell\u{7}").is_ok());
    r.words_received(["red", "bell\u{7}"]);
    assert!(r.poll());
    assert!(r.scene().unwrap().node("bell\u{7}").is_some());

    for animated in [true, false] {
        parse_svg(&r.to_svg(SvgOptions { animated })).unwrap();
    }
    let image = rasterize_svg(&r.to_svg(SvgOptions { animated: false })).unwrap();
    assert_eq!((image.width, image.height), (500, 300));
}

#[test]
fn scene_rasterizes_at_canvas_size() {
    let r = ready_renderer(Theme::Dark);
    let image = rasterize_svg(&r.to_svg(SvgOptions { animated: false })).unwrap();
    assert_eq!((image.width, image.height), (500, 300));
    assert_eq!(image.data.len(), 500 * 300 * 4);
    // The gradient fades to transparent at the edges.
    let center = ((150 * 500 + 250) * 4 + 3) as usize;
    assert!(image.data[center] > 0);
    assert_eq!(image.data[3], 0);

    let path = out_dir().join("dark.png");
    write_png(&image, &path).unwrap();
    let decoded = image::open(&path).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (500, 300));
}

#[test]
fn waiting_state_renders_placeholder() {
    let r = CloudRenderer::new(
        CloudConfig::default(),
        CanvasSize::new(640.0, 360.0).unwrap(),
        SpiralLayout::default(),
    )
    .unwrap();
    let svg = r.to_svg(SvgOptions::default());
    assert!(svg.contains("Waiting for responses..."));
    let image = rasterize_svg(&svg).unwrap();
    assert_eq!((image.width, image.height), (640, 360));
}

#[test]
fn theme_switch_changes_background_and_palette() {
    let mut r = ready_renderer(Theme::Light);
    let light = r.to_svg(SvgOptions::default());
    r.set_theme(Theme::Dark);
    assert!(r.poll());
    let dark = r.to_svg(SvgOptions::default());

    assert!(light.contains("wordcloud-gradient-light"));
    assert!(dark.contains("wordcloud-gradient-dark"));
    assert_ne!(light, dark);
}
