use super::*;

fn red_icon() -> IconAsset {
    IconAsset::from_rgba(image::RgbaImage::from_pixel(
        16,
        16,
        image::Rgba([255, 0, 0, 255]),
    ))
    .unwrap()
}

fn px(img: &image::RgbaImage, x: u32, y: u32) -> [u8; 4] {
    img.get_pixel(x, y).0
}

#[test]
fn display_text_uses_placeholder_for_empty_or_missing() {
    assert_eq!(display_text(None, DEFAULT_PLACEHOLDER), "YOUR NAME");
    assert_eq!(display_text(Some(""), DEFAULT_PLACEHOLDER), "YOUR NAME");
    assert_eq!(display_text(Some("Alice"), DEFAULT_PLACEHOLDER), "ALICE");
    assert_eq!(display_text(Some("straße"), DEFAULT_PLACEHOLDER), "STRASSE");
    assert_eq!(display_text(None, "guest"), "GUEST");
}

#[test]
fn canonical_layout_geometry() {
    let l = CardLayout::canonical();
    assert_eq!(l.size, 512);
    assert_eq!(l.icon_rect, Rect::new(192.0, 152.0, 320.0, 280.0));
    assert_eq!(l.text_anchor, Point::new(256.0, 432.0));
}

#[test]
fn style_json_fills_missing_fields_with_defaults() {
    let s: CardStyle = serde_json::from_str(r##"{"background": "#102030"}"##).unwrap();
    assert_eq!(s.background.to_rgba8(), [0x10, 0x20, 0x30, 255]);
    assert_eq!(s.text_color, StyleColor::WHITE);
    assert_eq!(s.font_size_px, 28.0);
    assert_eq!(s.letter_spacing_px, 4.0);
    assert!(s.bold);
    assert_eq!(s.placeholder, "YOUR NAME");

    assert!(serde_json::from_str::<CardStyle>(r#"{"size": 1024}"#).is_err());
}

#[test]
fn style_validation_rejects_bad_numbers() {
    let s = CardStyle {
        font_size_px: 0.0,
        ..CardStyle::default()
    };
    assert!(matches!(s.validate(), Err(LanyardError::Validation(_))));

    let s = CardStyle {
        letter_spacing_px: f32::NAN,
        ..CardStyle::default()
    };
    assert!(s.validate().is_err());

    let comp = CardCompositor::new().with_style(CardStyle {
        font_size_px: -3.0,
        ..CardStyle::default()
    });
    assert!(comp.compose(Some("Alice"), None).is_err());
}

#[test]
fn texture_is_always_card_sized() {
    let comp = CardCompositor::new();
    let icon = red_icon();
    let long = "W".repeat(200);
    for name in [None, Some(""), Some("Alice"), Some(long.as_str())] {
        for icon in [None, Some(&icon)] {
            let tex = comp.compose(name, icon).unwrap();
            assert_eq!((tex.width(), tex.height()), (CARD_SIZE, CARD_SIZE));
            let img = tex.to_rgba8().unwrap();
            assert_eq!(img.dimensions(), (512, 512));
        }
    }
}

#[test]
fn empty_and_missing_name_render_identically() {
    let comp = CardCompositor::new();
    let icon = red_icon();
    assert_eq!(
        comp.compose(Some(""), Some(&icon)).unwrap(),
        comp.compose(None, Some(&icon)).unwrap()
    );
    assert_eq!(
        comp.compose(Some(""), None).unwrap(),
        comp.compose(Some("your name"), None).unwrap()
    );
}

#[test]
fn compose_is_deterministic() {
    let comp = CardCompositor::new();
    let icon = red_icon();
    let a = comp.compose(Some("Alice"), Some(&icon)).unwrap();
    let b = comp.compose(Some("Alice"), Some(&icon)).unwrap();
    assert_eq!(a.png_bytes(), b.png_bytes());
}

#[test]
fn missing_icon_leaves_background() {
    let tex = CardCompositor::new().compose(Some("Alice"), None).unwrap();
    let img = tex.to_rgba8().unwrap();
    let l = CardLayout::canonical();
    for (x, y) in [
        (l.icon_rect.x0, l.icon_rect.y0),
        (l.icon_rect.center().x, l.icon_rect.center().y),
        (l.icon_rect.x1 - 1.0, l.icon_rect.y1 - 1.0),
    ] {
        assert_eq!(px(&img, x as u32, y as u32), [0, 0, 0, 255]);
    }
    assert_eq!(px(&img, 0, 0), [0, 0, 0, 255]);
    assert_eq!(px(&img, 511, 0), [0, 0, 0, 255]);
}

#[test]
fn icon_is_centered_above_middle() {
    let tex = CardCompositor::new()
        .compose(Some("Alice"), Some(&red_icon()))
        .unwrap();
    let img = tex.to_rgba8().unwrap();
    let is_red = |p: [u8; 4]| p[0] >= 250 && p[1] <= 5 && p[2] <= 5 && p[3] == 255;

    assert!(is_red(px(&img, 256, 216)));
    assert!(is_red(px(&img, 193, 153)));
    assert!(is_red(px(&img, 318, 278)));
    // Just outside the icon square.
    assert_eq!(px(&img, 190, 216), [0, 0, 0, 255]);
    assert_eq!(px(&img, 256, 150), [0, 0, 0, 255]);
    assert_eq!(px(&img, 256, 282), [0, 0, 0, 255]);
}

#[test]
fn capture_uses_attached_icon() {
    let icon = red_icon();
    let comp = CardCompositor::new().with_icon(Some(icon.clone()));
    assert_eq!(
        comp.capture(Some("Alice")).unwrap(),
        comp.compose(Some("Alice"), Some(&icon)).unwrap()
    );

    let bare = comp.clone().with_icon(None);
    assert_eq!(
        bare.capture(Some("Alice")).unwrap(),
        bare.compose(Some("Alice"), None).unwrap()
    );
}

#[test]
fn background_color_is_configurable() {
    let comp = CardCompositor::new().with_style(CardStyle {
        background: "#336699".parse().unwrap(),
        ..CardStyle::default()
    });
    let img = comp.compose(None, None).unwrap().to_rgba8().unwrap();
    assert_eq!(px(&img, 5, 5), [0x33, 0x66, 0x99, 255]);
}

fn lit_box(img: &image::RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let lit: Vec<(u32, u32)> = (0..512)
        .flat_map(|y| (0..512).map(move |x| (x, y)))
        .filter(|&(x, y)| px(img, x, y)[0] > 128)
        .collect();
    let x0 = lit.iter().map(|p| p.0).min()?;
    let x1 = lit.iter().map(|p| p.0).max()?;
    let y0 = lit.iter().map(|p| p.1).min()?;
    let y1 = lit.iter().map(|p| p.1).max()?;
    Some((x0, y0, x1, y1))
}

#[test]
fn unusable_font_bytes_are_rejected() {
    let err = CardCompositor::new()
        .with_font_bytes(b"not a font")
        .unwrap_err();
    assert!(matches!(err, LanyardError::Asset(_)));

    let err = CardCompositor::new()
        .with_font_path("tests/data/fonts/missing.ttf")
        .unwrap_err();
    assert!(matches!(err, LanyardError::Asset(_)));
}

#[test]
fn name_is_drawn_centered_near_bottom() {
    let img = CardCompositor::new()
        .compose(Some("Alice"), None)
        .unwrap()
        .to_rgba8()
        .unwrap();
    let (x0, y0, x1, y1) = lit_box(&img).expect("name pixels");

    assert!((400..464).contains(&y0), "top {y0}");
    assert!((400..464).contains(&y1), "bottom {y1}");
    let mid_y = (y0 + y1) as i64 / 2;
    assert!((mid_y - 432).abs() <= 8, "middle {mid_y}");
    let mid_x = (x0 + x1) as i64 / 2;
    assert!((mid_x - 256).abs() <= 8, "center {mid_x}");
    // Five bold monospace cells at 28px plus spacing.
    assert!(x1 - x0 > 60 && x1 - x0 < 160, "width {}", x1 - x0);
}

#[test]
fn caller_font_renders_without_host_fonts() {
    let font = std::fs::read("tests/data/fonts/card.ttf").unwrap();
    let comp = CardCompositor::new().with_font_bytes(&font).unwrap();
    let img = comp.compose(Some("Alice"), None).unwrap().to_rgba8().unwrap();
    let (x0, y0, x1, y1) = lit_box(&img).expect("name pixels");
    assert!((400..464).contains(&y0) && (400..464).contains(&y1));
    assert!((((x0 + x1) / 2) as i64 - 256).abs() <= 8);

    let bundled = CardCompositor::new().compose(Some("Alice"), None).unwrap();
    assert_ne!(comp.compose(Some("Alice"), None).unwrap(), bundled);

    let from_path = CardCompositor::new()
        .with_font_path("tests/data/fonts/card.ttf")
        .unwrap();
    assert_eq!(
        from_path.compose(Some("Alice"), None).unwrap(),
        comp.compose(Some("Alice"), None).unwrap()
    );
}

#[test]
fn placeholder_is_drawn_when_name_missing() {
    let img = CardCompositor::new()
        .compose(None, None)
        .unwrap()
        .to_rgba8()
        .unwrap();
    let (x0, _, x1, _) = lit_box(&img).expect("placeholder pixels");
    // "YOUR NAME" is nine cells, wider than "ALICE".
    assert!(x1 - x0 > 160, "width {}", x1 - x0);
}

#[test]
fn whitespace_name_renders_blank_card() {
    let img = CardCompositor::new()
        .compose(Some("   "), None)
        .unwrap()
        .to_rgba8()
        .unwrap();
    assert!(lit_box(&img).is_none());
}
