//! End-to-end tests: names in, preview and PDF out

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use pretty_assertions::assert_eq;

use namecards::layout::quadrant_at;
use namecards::{
    compose_pdf, load_model, render_preview, ComposeError, ComposeState, EditScript, FontKind,
    FontResource, NameFormat, NamecardConfig, OutputComposer, PdfDocument, Point, PointerSession,
    PreviewRenderer, Quadrant,
};

const NINE_NAMES: &str = "Ada Lovelace
Alan Turing
Grace Hopper
Edsger Dijkstra
Barbara Liskov
Donald Knuth
Frances Allen
John McCarthy
Margaret Hamilton
";

fn template_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let content = Content {
        operations: vec![
            Operation::new("re", vec![0.into(), 421.into(), 595.into(), 1.into()]),
            Operation::new("f", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        "Resources" => dictionary! {},
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1_i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

#[test]
fn test_nine_names_fill_three_pages() {
    let model = load_model(NINE_NAMES, NameFormat::Text, &NamecardConfig::default()).unwrap();
    assert_eq!(model.len(), 9);
    assert_eq!(model.page_count(), 3);
    assert_eq!(model.entries_on_page(0).len(), 4);
    assert_eq!(model.entries_on_page(1).len(), 4);
    assert_eq!(model.entries_on_page(2).len(), 1);
    assert_eq!(
        model.entry(8).unwrap().text_lines,
        vec!["Margaret".to_string(), "Hamilton".to_string()]
    );
}

#[test]
fn test_drag_across_quadrants_keeps_drop_and_flags_it() {
    let config = NamecardConfig::default();
    let mut model = load_model(NINE_NAMES, NameFormat::Text, &config).unwrap();
    let renderer = PreviewRenderer::new(
        FontResource::helvetica(),
        config.preview.clone(),
        config.stylesheet.clone(),
    );
    let mut session = PointerSession::new();
    assert_eq!(session.set_page(&mut model, 1), 1);

    let grab = model.entry(5).unwrap().anchor;
    assert_eq!(session.press(&mut model, &renderer, grab).unwrap(), Some(5));
    assert_eq!(model.selected(), Some(5));

    let dropped = session
        .move_to(&mut model, Point::new(10.0, 10.0))
        .unwrap();
    assert_eq!(dropped, Some(Point::new(10.0, 10.0)));
    assert_eq!(session.release(), Some(5));

    let entry = model.entry(5).unwrap();
    assert_eq!(entry.anchor, Point::new(10.0, 10.0));
    assert_eq!(model.default_quadrant(5), Quadrant::TopRight);
    assert_eq!(quadrant_at(entry.anchor, 595.0, 842.0), Quadrant::BottomLeft);
    assert!(session.out_of_bounds());

    let svg = renderer.render(&model, 1, None).unwrap();
    assert!(svg.contains(r#"<g id="entry-5" class="nc-entry nc-selected nc-out-of-bounds">"#));
}

#[test]
fn test_preview_flips_y_axis() {
    let config = NamecardConfig::from_str("[preview]\ncanvas_width = 595\n").unwrap();
    let model = load_model("Max Power\nErika Muster\n", NameFormat::Text, &config).unwrap();
    let svg = render_preview(&model, 0, &config, &FontResource::helvetica(), None).unwrap();

    assert!(svg.contains(r#"viewBox="0 0 595 842""#));
    assert_eq!(svg.matches("<g id=\"entry-").count(), 2);
    // Top-left quadrant starts at the top of the surface
    assert!(svg.contains(r#"<rect class="nc-quadrant" x="0" y="0" width="297.5" height="421"/>"#));
    assert!(svg.contains(r#"<rect class="nc-quadrant" x="0" y="421" width="297.5" height="421"/>"#));
    assert!(svg.contains(r#"<text class="nc-text" x="126.08" y="196.1" font-size="24">Max</text>"#));
}

#[test]
fn test_compose_pdf_has_one_page_per_four_names() {
    let config = NamecardConfig::default();
    let model = load_model(NINE_NAMES, NameFormat::Text, &config).unwrap();
    let output = compose_pdf(&model, &template_pdf(), None, &config).unwrap();

    assert_eq!(output.page_count, 3);
    assert_eq!(output.font, FontKind::Standard);
    assert!(output.warnings.is_empty());

    let doc = Document::load_mem(&output.bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 3);
}

#[test]
fn test_corrupt_font_falls_back_to_helvetica() {
    let config = NamecardConfig::default();
    let model = load_model("Ada Lovelace\n", NameFormat::Text, &config).unwrap();
    let output = compose_pdf(&model, &template_pdf(), Some(&b"not a font"[..]), &config).unwrap();

    assert_eq!(output.font, FontKind::Standard);
    assert_eq!(output.warnings.len(), 1);
    let doc = Document::load_mem(&output.bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn test_custom_truetype_font_is_embedded() {
    let config = NamecardConfig::default();
    let model = load_model(NINE_NAMES, NameFormat::Text, &config).unwrap();
    let font = include_bytes!("fixtures/namecards-test.ttf");
    let output = compose_pdf(&model, &template_pdf(), Some(&font[..]), &config).unwrap();

    assert_eq!(output.font, FontKind::Custom);
    assert!(output.warnings.is_empty());

    let doc = Document::load_mem(&output.bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 3);
    let descriptor = doc
        .objects
        .values()
        .filter_map(|object| object.as_dict().ok())
        .find(|dict| dict.has(b"FontFile2"))
        .expect("font descriptor with an embedded TrueType program");
    assert_eq!(
        descriptor.get(b"FontName").unwrap().as_name().unwrap(),
        b"NamecardsTest-Regular"
    );
}

#[test]
fn test_preview_inlines_custom_font() {
    let config = NamecardConfig::default();
    let model = load_model("Max Power\n", NameFormat::Text, &config).unwrap();
    let font = FontResource::from_bytes(include_bytes!("fixtures/namecards-test.ttf")).unwrap();
    let svg = render_preview(&model, 0, &config, &font, None).unwrap();

    assert!(svg.contains(r#"@font-face { font-family: "NamecardsTest-Regular"; src: url(data:font/ttf;base64,"#));
}

#[test]
fn test_failed_template_leaves_composer_failed() {
    let model = load_model("Ada Lovelace\n", NameFormat::Text, &NamecardConfig::default()).unwrap();
    let mut composer = OutputComposer::default();
    let err = composer
        .compose::<PdfDocument>(&model, b"not a pdf at all", None)
        .unwrap_err();

    assert!(matches!(err, ComposeError::Decode(_)));
    assert!(matches!(composer.state(), ComposeState::Failed { .. }));
    assert!(!composer.is_busy());
}

#[test]
fn test_edit_script_before_compose() {
    let config = NamecardConfig::default();
    let mut model = load_model(NINE_NAMES, NameFormat::Text, &config).unwrap();
    let script = EditScript::from_str(
        r#"
[[edit]]
index = 8
text = "Margaret H. Hamilton"
font_size = 30
"#,
    )
    .unwrap();
    script.apply(&mut model).unwrap();

    let entry = model.entry(8).unwrap();
    assert_eq!(entry.text_lines, vec!["Margaret".to_string(), "H. Hamilton".to_string()]);
    assert_eq!(entry.font_size, 30);
    assert_eq!(model.selected(), None);

    let output = compose_pdf(&model, &template_pdf(), None, &config).unwrap();
    assert_eq!(output.page_count, 3);
}
