use crate::dto::mock_test_dto::TestRankingResponse;
use crate::error::Result;
use crate::utils::time::{format_export, now};
use rust_xlsxwriter::*;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub struct ExportService;

impl ExportService {
    /// Builds a styled workbook with one row per ranked result.
    pub fn generate_ranking_xlsx(ranking: &TestRankingResponse) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Results")?;

        let primary_color = Color::RGB(0x1E293B);
        let header_bg = Color::RGB(0x0F172A);
        let header_text = Color::White;
        let alt_row_1 = Color::RGB(0xF8FAFC);
        let alt_row_2 = Color::White;
        let border_color = Color::RGB(0xE2E8F0);
        let passed_color = Color::RGB(0x10B981);
        let failed_color = Color::RGB(0xEF4444);

        let columns = [
            ("Rank", 8.0),
            ("Candidate", 30.0),
            ("Email", 32.0),
            ("Score", 10.0),
            ("Total", 10.0),
            ("Percentage", 14.0),
            ("Passed", 10.0),
            ("Completed at", 20.0),
        ];
        let last_col = (columns.len() - 1) as u16;

        for (i, (_, width)) in columns.iter().enumerate() {
            worksheet.set_column_width(i as u16, *width)?;
        }

        let title_format = Format::new()
            .set_font_size(16)
            .set_bold()
            .set_font_color(header_text)
            .set_background_color(primary_color)
            .set_align(FormatAlign::CenterAcross)
            .set_align(FormatAlign::VerticalCenter);
        worksheet.set_row_height(0, 40)?;
        worksheet.merge_range(0, 0, 0, last_col, &ranking.title, &title_format)?;

        let subtitle_format = Format::new()
            .set_font_size(10)
            .set_italic()
            .set_font_color(Color::RGB(0x94A3B8))
            .set_background_color(primary_color)
            .set_align(FormatAlign::CenterAcross)
            .set_align(FormatAlign::VerticalCenter);
        worksheet.set_row_height(1, 22)?;
        let subtitle = format!(
            "Exported {} UTC  •  Passing score: {}  •  Applicants: {}  •  Completed: {}",
            format_export(now()),
            ranking.passing_score,
            ranking.total_applicants,
            ranking.results.len()
        );
        worksheet.merge_range(1, 0, 1, last_col, &subtitle, &subtitle_format)?;

        let header_format = Format::new()
            .set_bold()
            .set_font_size(10)
            .set_font_color(header_text)
            .set_background_color(header_bg)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);
        let header_row = 2;
        worksheet.set_row_height(header_row, 26)?;
        for (i, (name, _)) in columns.iter().enumerate() {
            worksheet.write_string_with_format(header_row, i as u16, *name, &header_format)?;
        }

        let data_start_row = 3;
        for (idx, result) in ranking.results.iter().enumerate() {
            let row = data_start_row + idx as u32;
            let bg = if idx % 2 == 0 { alt_row_1 } else { alt_row_2 };

            let base_fmt = Format::new()
                .set_font_size(10)
                .set_background_color(bg)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin)
                .set_border_color(border_color);
            let center_fmt = base_fmt.clone().set_align(FormatAlign::Center);
            let percent_fmt = center_fmt.clone().set_num_format("0.00");

            worksheet.set_row_height(row, 20)?;
            worksheet.write_number_with_format(row, 0, f64::from(result.rank), &center_fmt)?;
            worksheet.write_string_with_format(row, 1, &result.candidate_name, &base_fmt.clone().set_bold())?;
            worksheet.write_string_with_format(row, 2, &result.candidate_email, &base_fmt)?;
            worksheet.write_number_with_format(row, 3, f64::from(result.score), &center_fmt)?;
            worksheet.write_number_with_format(row, 4, f64::from(result.total_points), &center_fmt)?;
            worksheet.write_number_with_format(row, 5, result.percentage, &percent_fmt)?;

            let passed_fmt = Format::new()
                .set_font_size(10)
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(if result.has_passed { passed_color } else { failed_color })
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin)
                .set_border_color(border_color);
            worksheet.write_string_with_format(
                row,
                6,
                if result.has_passed { "Yes" } else { "No" },
                &passed_fmt,
            )?;

            let completed = result
                .completed_at
                .map(format_export)
                .unwrap_or_else(|| "—".to_string());
            worksheet.write_string_with_format(row, 7, &completed, &center_fmt)?;
        }

        let total_row = data_start_row + ranking.results.len() as u32 + 1;
        let summary_fmt = Format::new()
            .set_bold()
            .set_font_size(10)
            .set_font_color(primary_color)
            .set_background_color(Color::RGB(0xE0E7FF))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);

        let passed = ranking.results.iter().filter(|r| r.has_passed).count();
        let average = if ranking.results.is_empty() {
            0.0
        } else {
            ranking.results.iter().map(|r| r.percentage).sum::<f64>() / ranking.results.len() as f64
        };
        worksheet.set_row_height(total_row, 24)?;
        worksheet.merge_range(
            total_row,
            0,
            total_row,
            last_col,
            &format!(
                "Passed: {} of {}  •  Average: {:.2}%",
                passed,
                ranking.results.len(),
                average
            ),
            &summary_fmt,
        )?;

        worksheet.set_freeze_panes(3, 0)?;
        worksheet.autofilter(
            header_row,
            0,
            (data_start_row + ranking.results.len() as u32).saturating_sub(1).max(header_row),
            last_col,
        )?;

        let buffer = workbook.save_to_buffer()?;
        Ok(buffer)
    }
}
