//! End-to-end tests over PDFs generated in memory with lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use pdf_outline::{extract_outline, DocumentOutline, HeadingLevel, OutlineConfig, OutlineExtractor};

const BODY: &str = "The committee reviewed every proposal against the published criteria.";

fn line(font: &str, size: i64, x: i64, y: i64, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]
}

fn body_block(start_y: i64, lines: i64) -> Vec<Operation> {
    (0..lines)
        .flat_map(|i| line("F1", 10, 72, start_y - i * 14, BODY))
        .collect()
}

/// Build a PDF whose pages share Helvetica (F1) and Helvetica-Bold (F2).
fn build_pdf(pages: Vec<Vec<Operation>>, title: Option<&str>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let page_count = pages.len();
    let mut kids: Vec<Object> = Vec::new();
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if let Some(title) = title {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
        });
        doc.trailer.set("Info", info_id);
    }

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}

fn report_pages() -> Vec<Vec<Operation>> {
    let mut first = Vec::new();
    first.extend(line("F2", 9, 72, 770, "ACME Corp Internal"));
    first.extend(line("F2", 24, 72, 700, "Annual Planning Guide"));
    first.extend(body_block(660, 6));
    first.extend(line("F1", 10, 72, 560, "1. Introduction"));
    first.extend(body_block(540, 6));
    first.extend(line("F1", 9, 300, 30, "Page 1"));

    let mut second = Vec::new();
    second.extend(line("F2", 9, 72, 770, "ACME Corp Internal"));
    second.extend(line("F1", 18, 72, 700, "Background Study"));
    second.extend(body_block(670, 4));
    second.extend(line("F2", 10, 72, 600, "2.1 Prior Work"));
    second.extend(body_block(580, 4));
    second.extend(line("F1", 14, 72, 500, "Open Questions"));
    second.extend(body_block(480, 4));
    second.extend(line("F1", 9, 300, 30, "Page 2"));

    vec![first, second]
}

fn entries(outline: &DocumentOutline) -> Vec<(HeadingLevel, &str, usize)> {
    outline
        .outline
        .iter()
        .map(|e| (e.level, e.text.as_str(), e.page))
        .collect()
}

#[test]
fn test_report_outline() {
    let pdf = build_pdf(report_pages(), None);
    let outline = extract_outline(&pdf, &OutlineConfig::default()).unwrap();

    assert_eq!(outline.title, "Annual Planning Guide");
    assert_eq!(
        entries(&outline),
        vec![
            (HeadingLevel::H1, "1. Introduction", 1),
            (HeadingLevel::H1, "Background Study", 2),
            (HeadingLevel::H2, "2.1 Prior Work", 2),
            (HeadingLevel::H2, "Open Questions", 2),
        ]
    );
}

#[test]
fn test_outline_invariants() {
    let pdf = build_pdf(report_pages(), None);
    let outline = extract_outline(&pdf, &OutlineConfig::default()).unwrap();

    assert!(outline.outline.windows(2).all(|w| w[0].page <= w[1].page));

    let mut keys: Vec<(String, usize)> = outline
        .outline
        .iter()
        .map(|e| (e.text.to_lowercase(), e.page))
        .collect();
    let total = keys.len();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), total);

    assert!(outline.outline.iter().all(|e| e.text != outline.title));
}

#[test]
fn test_metadata_title_is_never_overridden() {
    let pdf = build_pdf(report_pages(), Some("FY25 Planning Guide"));
    let outline = extract_outline(&pdf, &OutlineConfig::default()).unwrap();

    assert_eq!(outline.title, "FY25 Planning Guide");
    assert_eq!(outline.outline[0].text, "Annual Planning Guide");
    assert_eq!(outline.outline[0].level, HeadingLevel::H1);
}

#[test]
fn test_placeholder_metadata_title_is_ignored() {
    let pdf = build_pdf(report_pages(), Some("Untitled"));
    let outline = extract_outline(&pdf, &OutlineConfig::default()).unwrap();
    assert_eq!(outline.title, "Annual Planning Guide");
}

#[test]
fn test_repeated_output_is_identical() {
    let pdf = build_pdf(report_pages(), None);
    let extractor = OutlineExtractor::default();
    let first = serde_json::to_string_pretty(&extractor.extract(&pdf).unwrap()).unwrap();
    let second = serde_json::to_string_pretty(&extractor.extract(&pdf).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_page_cap() {
    let pdf = build_pdf(report_pages(), None);
    let config = OutlineConfig::default().with_max_pages(1);
    let outline = extract_outline(&pdf, &config).unwrap();
    assert!(outline.outline.iter().all(|e| e.page == 1));
    assert!(entries(&outline).contains(&(HeadingLevel::H1, "1. Introduction", 1)));
    assert!(outline.outline.iter().all(|e| e.text != "Background Study"));
}

#[test]
fn test_document_without_text() {
    let pdf = build_pdf(vec![Vec::new()], Some("Scanned Report"));
    let outline = extract_outline(&pdf, &OutlineConfig::default()).unwrap();
    assert_eq!(serde_json::to_string(&outline).unwrap(), r#"{"title":"","outline":[]}"#);
}

#[test]
fn test_corrupted_input_is_an_error() {
    let result = extract_outline(b"%PDF-1.4 this is not really a pdf", &OutlineConfig::default());
    assert!(result.is_err());
}

fn scaled_page() -> Vec<Operation> {
    let mut page = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), Object::Integer(1)]),
        Operation::new(
            "Tm",
            [20, 0, 0, 20, 72, 650].into_iter().map(Object::Integer).collect(),
        ),
        Operation::new("Tj", vec![Object::string_literal("Scaled Heading")]),
        Operation::new("ET", vec![]),
    ];
    page.extend(body_block(600, 8));
    page
}

#[test]
fn test_size_from_text_matrix() {
    let pdf = build_pdf(vec![scaled_page(), scaled_page()], None);
    let outline = extract_outline(&pdf, &OutlineConfig::default()).unwrap();

    // Page 1 copy becomes the title; the page 2 copy is a 2x-size heading
    assert_eq!(outline.title, "Scaled Heading");
    assert_eq!(entries(&outline), vec![(HeadingLevel::H1, "Scaled Heading", 2)]);
}

#[test]
fn test_pieces_of_one_line_are_merged() {
    let mut page = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F2".into(), Object::Integer(16)]),
        Operation::new("Td", vec![Object::Integer(72), Object::Integer(650)]),
        Operation::new(
            "TJ",
            vec![Object::Array(vec![
                Object::string_literal("Risk"),
                Object::Integer(-400),
                Object::string_literal("Register"),
            ])],
        ),
        Operation::new("ET", vec![]),
    ];
    page.extend(body_block(600, 8));
    let mut cover = line("F2", 28, 72, 700, "Operations Review");
    cover.extend(body_block(650, 8));

    let pdf = build_pdf(vec![cover, page], None);
    let outline = extract_outline(&pdf, &OutlineConfig::default()).unwrap();
    assert_eq!(outline.title, "Operations Review");
    assert_eq!(entries(&outline), vec![(HeadingLevel::H2, "Risk Register", 2)]);
}

#[test]
fn test_lone_cover_title() {
    let cover = line("F1", 24, 72, 700, "Annual Report");
    let mut second = line("F1", 14, 72, 700, "Contents");
    second.extend(body_block(670, 8));

    let pdf = build_pdf(vec![cover, second], None);
    let outline = extract_outline(&pdf, &OutlineConfig::default()).unwrap();
    assert_eq!(outline.title, "Annual Report");
    assert_eq!(entries(&outline), vec![(HeadingLevel::H2, "Contents", 2)]);
}

#[test]
fn test_toc_leader_copy_is_not_repeated() {
    let mut page = line("F2", 22, 72, 720, "Field Manual");
    page.extend(line("F1", 10, 72, 680, "1. Introduction ........ 3"));
    page.extend(line("F1", 10, 72, 660, "1. Introduction"));
    page.extend(body_block(640, 8));

    let pdf = build_pdf(vec![page], None);
    let outline = extract_outline(&pdf, &OutlineConfig::default()).unwrap();
    assert_eq!(outline.title, "Field Manual");
    assert_eq!(entries(&outline), vec![(HeadingLevel::H1, "1. Introduction", 1)]);
}
