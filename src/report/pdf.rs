use std::path::Path;

use anyhow::{Context, Result};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Polygon, Rgb,
};

use crate::engine::ScoringPolicy;
use crate::models::{ImageAssessment, Verdict};

use super::count_verdict;

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 18.0;
const COVER_HDR_H: f32 = 72.0;
const T_END: f32 = PAGE_W - MARGIN;

// ── Palette ───────────────────────────────────────────────────────────────────
type Rgb3 = (f32, f32, f32);

const BG:           Rgb3 = (1.00, 1.00, 1.00);
const PANEL:        Rgb3 = (1.00, 1.00, 1.00);
const PANEL_ALT:    Rgb3 = (0.95, 0.96, 0.99);
const PANEL_BORDER: Rgb3 = (0.85, 0.87, 0.92);
const ACCENT_TEAL:  Rgb3 = (0.05, 0.55, 0.60);
const ACCENT_BLU:   Rgb3 = (0.20, 0.46, 0.95);
const TEXT_PRI:     Rgb3 = (0.07, 0.08, 0.14);
const TEXT_SEC:     Rgb3 = (0.36, 0.40, 0.52);
const TEXT_MUT:     Rgb3 = (0.58, 0.63, 0.72);
const WHITE:        Rgb3 = (1.00, 1.00, 1.00);
const WHITE_DIM:    Rgb3 = (0.82, 0.93, 0.96);

const AUTH_BG: Rgb3 = (0.90, 0.98, 0.92);
const AUTH_FG: Rgb3 = (0.07, 0.52, 0.22);
const SUSP_BG: Rgb3 = (1.00, 0.95, 0.87);
const SUSP_FG: Rgb3 = (0.70, 0.40, 0.02);
const FAKE_BG: Rgb3 = (1.00, 0.91, 0.91);
const FAKE_FG: Rgb3 = (0.76, 0.09, 0.13);

const R_BADGE: f32 = 1.5;

/// Render a PDF report: cover page → image table.
pub fn render(
    assessments: &[ImageAssessment],
    rules_source: &str,
    policy: &ScoringPolicy,
    output_path: &Path,
) -> Result<()> {
    let doc = PdfDocument::empty("Authenticity Report");

    add_cover_page(&doc, assessments, rules_source, policy)?;
    add_table_pages(&doc, assessments)?;

    let bytes = doc.save_to_bytes()?;
    std::fs::write(output_path, &bytes)
        .with_context(|| format!("Failed to write PDF to {}", output_path.display()))?;

    println!("PDF report written to: {}", output_path.display());
    Ok(())
}

// ── Cover page ────────────────────────────────────────────────────────────────

fn add_cover_page(
    doc: &PdfDocumentReference,
    assessments: &[ImageAssessment],
    rules_source: &str,
    policy: &ScoringPolicy,
) -> Result<()> {
    let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Cover");
    let layer = doc.get_page(page_idx).get_layer(layer_idx);

    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
    let hdr_bot = PAGE_H - COVER_HDR_H;
    fill_gradient_h(&layer, 0.0, hdr_bot, PAGE_W, COVER_HDR_H, ACCENT_TEAL, ACCENT_BLU, 28);

    set_color(&layer, WHITE_DIM);
    layer.use_text(
        format!("authenticity-checkr v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(PAGE_W - MARGIN - 50.0), Mm(PAGE_H - 10.5), &font_r,
    );

    set_color(&layer, WHITE);
    layer.use_text("Authenticity", 28.0, Mm(MARGIN), Mm(PAGE_H - 26.0), &font_b);
    set_color(&layer, WHITE_DIM);
    layer.use_text("Report", 28.0, Mm(MARGIN), Mm(PAGE_H - 41.0), &font_b);

    // Rule set chip
    let chip_y = hdr_bot - 18.0;
    let chip_h = 12.0f32;
    let chip_w = 120.0f32;
    fill_rounded_rect(&layer, MARGIN, chip_y, chip_w, chip_h, R_BADGE, PANEL);
    stroke_rounded_rect(&layer, MARGIN, chip_y, chip_w, chip_h, R_BADGE, PANEL_BORDER);
    fill_rect(&layer, MARGIN, chip_y, 2.5, chip_h, ACCENT_TEAL);

    set_color(&layer, TEXT_MUT);
    layer.use_text("RULE SET", 6.0, Mm(MARGIN + 5.0), Mm(chip_y + chip_h - 3.8), &font_b);
    set_color(&layer, TEXT_PRI);
    layer.use_text(truncate(rules_source, 40), 9.5, Mm(MARGIN + 5.0), Mm(chip_y + 2.8), &font_b);

    set_color(&layer, TEXT_SEC);
    layer.use_text(format!("Scored  {}", today()), 9.0, Mm(MARGIN), Mm(chip_y - 8.0), &font_r);

    let rule_y = chip_y - 16.5;
    draw_hline(&layer, MARGIN, T_END, rule_y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("OVERVIEW", 6.5, Mm(MARGIN), Mm(rule_y - 7.0), &font_b);

    let card_y = rule_y - 42.0;
    let card_h = 26.0f32;
    let gap = 4.0f32;
    let card_w = (T_END - MARGIN - gap * 3.0) / 4.0;

    let cards: [(&str, String, Rgb3); 4] = [
        ("IMAGES", assessments.len().to_string(), ACCENT_BLU),
        ("AUTHENTIC", count_verdict(assessments, Verdict::Authentic).to_string(), AUTH_FG),
        ("SUSPICIOUS", count_verdict(assessments, Verdict::Suspicious).to_string(), SUSP_FG),
        ("FAKE", count_verdict(assessments, Verdict::Fake).to_string(), FAKE_FG),
    ];

    for (i, (label, value, accent)) in cards.iter().enumerate() {
        let cx = MARGIN + (card_w + gap) * i as f32;
        draw_stat_card(&layer, cx, card_y, card_w, card_h, label, value, *accent, &font_r, &font_b);
    }

    let section_y = card_y - 13.0;
    draw_hline(&layer, MARGIN, T_END, section_y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("HOW TO READ THIS REPORT", 6.5, Mm(MARGIN), Mm(section_y - 7.5), &font_b);

    let items = [
        ("Score", "Confidence of authenticity from 0.00 to 1.00".to_string()),
        ("Verdict", verdict_legend(policy)),
        ("Note", "The leading recommendation for the image".to_string()),
    ];
    for (j, (title, desc)) in items.iter().enumerate() {
        let iy = section_y - 15.0 - j as f32 * 10.0;
        fill_rounded_rect(&layer, MARGIN, iy + 2.0, 2.0, 2.0, 1.0, ACCENT_TEAL);
        set_color(&layer, TEXT_PRI);
        layer.use_text(*title, 8.5, Mm(MARGIN + 5.0), Mm(iy + 2.0), &font_b);
        set_color(&layer, TEXT_SEC);
        layer.use_text(desc.as_str(), 8.0, Mm(MARGIN + 5.0), Mm(iy - 3.5), &font_r);
    }

    draw_footer(&layer, &font_r);
    Ok(())
}

fn verdict_legend(policy: &ScoringPolicy) -> String {
    format!(
        "authentic >= {:.2} > suspicious >= {:.2} > fake",
        policy.authentic_threshold, policy.suspicious_threshold
    )
}

#[allow(clippy::too_many_arguments)]
fn draw_stat_card(
    layer: &PdfLayerReference,
    x: f32, y: f32, w: f32, h: f32,
    label: &str,
    value: &str,
    accent: Rgb3,
    font_r: &IndirectFontRef,
    font_b: &IndirectFontRef,
) {
    fill_rounded_rect(layer, x, y, w, h, R_BADGE, PANEL);
    stroke_rounded_rect(layer, x, y, w, h, R_BADGE, PANEL_BORDER);
    fill_rect(layer, x, y + h - 2.0, w, 2.0, accent);

    set_color(layer, accent);
    layer.use_text(value, 20.0, Mm(x + 5.0), Mm(y + h * 0.38), font_b);
    set_color(layer, TEXT_MUT);
    layer.use_text(label, 6.5, Mm(x + 5.0), Mm(y + 3.5), font_r);
}

// ── Image table ───────────────────────────────────────────────────────────────

fn add_table_pages(doc: &PdfDocumentReference, assessments: &[ImageAssessment]) -> Result<()> {
    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    const BASE_ROW_H: f32 = 7.0;
    const EXTRA_LINE_H: f32 = 3.5;
    const HDR_Y: f32 = 268.5;
    const FIRST_Y: f32 = 259.5;
    const BOT_MARGIN: f32 = 25.0;
    const NOTE_WRAP: usize = 44;

    //  IMAGE      SCORE     VERDICT     NOTE
    //  18…70      70…88     88…112      112…192  (mm)
    let col_x = [MARGIN, MARGIN + 52.0, MARGIN + 70.0, MARGIN + 94.0];
    let headers = ["IMAGE", "SCORE", "VERDICT", "NOTE"];

    let rows: Vec<(Vec<String>, f32)> = assessments
        .iter()
        .map(|a| {
            let note = a.result.recommendations.first().map(String::as_str).unwrap_or("");
            let lines = wrap_text(note, NOTE_WRAP);
            let h = BASE_ROW_H + lines.len().saturating_sub(1) as f32 * EXTRA_LINE_H;
            (lines, h)
        })
        .collect();

    let mut cur_y = FIRST_Y;
    let mut page: Option<(PdfPageIndex, PdfLayerIndex)> = None;
    let mut page_num: u32 = 0;

    for (row_idx, (assessment, (note_lines, row_h))) in assessments.iter().zip(&rows).enumerate() {
        let row_h = *row_h;

        let (pi, li) = match page {
            Some(current) if cur_y - row_h >= BOT_MARGIN => current,
            _ => {
                page_num += 1;
                let (pi, li) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Images");
                let layer = doc.get_page(pi).get_layer(li);

                fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
                fill_gradient_h(&layer, 0.0, PAGE_H - 2.5, PAGE_W, 2.5, ACCENT_TEAL, ACCENT_BLU, 21);

                set_color(&layer, TEXT_PRI);
                layer.use_text("Scored Images", 14.0, Mm(MARGIN), Mm(282.5), &font_b);
                set_color(&layer, TEXT_MUT);
                layer.use_text(format!("Page {}", page_num), 8.0, Mm(T_END - 14.0), Mm(283.0), &font_r);
                draw_hline(&layer, MARGIN, T_END, 277.5, PANEL_BORDER);

                fill_rounded_rect(&layer, MARGIN, HDR_Y - 7.5, T_END - MARGIN, 9.5, R_BADGE, PANEL);
                stroke_rounded_rect(&layer, MARGIN, HDR_Y - 7.5, T_END - MARGIN, 9.5, R_BADGE, PANEL_BORDER);
                set_color(&layer, TEXT_MUT);
                for (i, h) in headers.iter().enumerate() {
                    layer.use_text(*h, 7.0, Mm(col_x[i] + 1.5), Mm(HDR_Y - 4.0), &font_b);
                }

                draw_footer(&layer, &font_r);

                cur_y = FIRST_Y;
                page = Some((pi, li));
                (pi, li)
            }
        };
        let layer = doc.get_page(pi).get_layer(li);

        let (verdict_str, verdict_fg, verdict_bg) = match assessment.result.verdict {
            Verdict::Authentic => ("AUTHENTIC", AUTH_FG, AUTH_BG),
            Verdict::Suspicious => ("SUSPICIOUS", SUSP_FG, SUSP_BG),
            Verdict::Fake => ("FAKE", FAKE_FG, FAKE_BG),
        };

        if row_idx % 2 == 0 {
            fill_rect(&layer, MARGIN, cur_y - row_h + 1.5, T_END - MARGIN, row_h, PANEL_ALT);
        }

        let text_y = cur_y - 4.0;

        set_color(&layer, TEXT_PRI);
        layer.use_text(truncate(&assessment.source, 32), 8.0, Mm(col_x[0] + 1.5), Mm(text_y), &font_r);
        set_color(&layer, TEXT_SEC);
        layer.use_text(
            format!("{:.2}", assessment.result.composite_score),
            8.0, Mm(col_x[1] + 1.5), Mm(text_y), &font_r,
        );

        let badge_x = col_x[2] + 1.5;
        let badge_y = cur_y - row_h + 2.2;
        fill_rounded_rect(&layer, badge_x, badge_y, 21.0, 4.8, R_BADGE, verdict_bg);
        set_color(&layer, verdict_fg);
        layer.use_text(verdict_str, 7.0, Mm(badge_x + 2.0), Mm(badge_y + 1.1), &font_b);

        set_color(&layer, TEXT_SEC);
        for (j, line) in note_lines.iter().enumerate() {
            let line_y = text_y - j as f32 * EXTRA_LINE_H;
            layer.use_text(line.as_str(), 7.5, Mm(col_x[3] + 1.5), Mm(line_y), &font_r);
        }

        draw_hline(&layer, MARGIN, T_END, cur_y - row_h + 1.5, PANEL_BORDER);
        cur_y -= row_h;
    }

    Ok(())
}

fn draw_footer(layer: &PdfLayerReference, font_r: &IndirectFontRef) {
    draw_hline(layer, MARGIN, T_END, 22.0, PANEL_BORDER);
    set_color(layer, TEXT_MUT);
    layer.use_text(
        format!("Generated by authenticity-checkr v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(MARGIN), Mm(15.0), font_r,
    );
    layer.use_text(today(), 7.5, Mm(T_END - 22.0), Mm(15.0), font_r);
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

fn rgb((r, g, b): Rgb3) -> Color {
    Color::Rgb(Rgb { r, g, b, icc_profile: None })
}

fn set_color(layer: &PdfLayerReference, color: Rgb3) {
    layer.set_fill_color(rgb(color));
}

fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, color: Rgb3) {
    layer.set_fill_color(rgb(color));
    layer.add_polygon(Polygon {
        rings: vec![vec![
            (Point::new(Mm(x), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y + h)), false),
            (Point::new(Mm(x), Mm(y + h)), false),
        ]],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_fill_color(rgb((0.0, 0.0, 0.0)));
}

/// Clockwise polygon ring approximating a rounded rectangle, 8 segments per corner.
fn rounded_rect_ring(x: f32, y: f32, w: f32, h: f32, r: f32) -> Vec<(Point, bool)> {
    let r = r.min(w / 2.0).min(h / 2.0);
    const SEGS: usize = 8;
    let corners = [
        (x + w - r, y + r, 270.0f32, 360.0f32),
        (x + w - r, y + h - r, 0.0f32, 90.0f32),
        (x + r, y + h - r, 90.0f32, 180.0f32),
        (x + r, y + r, 180.0f32, 270.0f32),
    ];

    let mut pts = Vec::with_capacity(4 * (SEGS + 1));
    for (cx, cy, start, end) in corners {
        for i in 0..=SEGS {
            let angle = (start + (end - start) * i as f32 / SEGS as f32).to_radians();
            pts.push((Point::new(Mm(cx + r * angle.cos()), Mm(cy + r * angle.sin())), false));
        }
    }
    pts
}

fn fill_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, r: f32, color: Rgb3) {
    layer.set_fill_color(rgb(color));
    layer.add_polygon(Polygon {
        rings: vec![rounded_rect_ring(x, y, w, h, r)],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_fill_color(rgb((0.0, 0.0, 0.0)));
}

fn stroke_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, r: f32, color: Rgb3) {
    layer.set_outline_color(rgb(color));
    layer.set_outline_thickness(0.4);
    layer.add_polygon(Polygon {
        rings: vec![rounded_rect_ring(x, y, w, h, r)],
        mode: PaintMode::Stroke,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_outline_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_thickness(1.0);
}

fn draw_hline(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32, color: Rgb3) {
    layer.set_outline_color(rgb(color));
    layer.set_outline_thickness(0.3);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
    layer.set_outline_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_thickness(1.0);
}

/// Left-to-right gradient built from `steps` vertical strips.
#[allow(clippy::too_many_arguments)]
fn fill_gradient_h(
    layer: &PdfLayerReference,
    x: f32, y: f32, w: f32, h: f32,
    from: Rgb3,
    to: Rgb3,
    steps: usize,
) {
    let step_w = w / steps as f32;
    for i in 0..steps {
        let t = i as f32 / (steps - 1).max(1) as f32;
        let color = (
            from.0 + (to.0 - from.0) * t,
            from.1 + (to.1 - from.1) * t,
            from.2 + (to.2 - from.2) * t,
        );
        // strips overlap slightly to hide rounding gaps
        fill_rect(layer, x + i as f32 * step_w, y, step_w + 0.6, h, color);
    }
}

// ── Text helpers ──────────────────────────────────────────────────────────────

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}…", s.chars().take(max.saturating_sub(1)).collect::<String>())
    } else {
        s.to_string()
    }
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Today's UTC date as `YYYY-MM-DD`.
fn today() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let (y, m, d) = civil_from_days((secs / 86_400) as i64);
    format!("{:04}-{:02}-{:02}", y, m, d)
}

/// Days since 1970-01-01 → proleptic Gregorian (year, month, day).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
