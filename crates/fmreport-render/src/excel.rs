//! Excel monthly overview renderer
//!
//! Generates a single-sheet XLSX report for a Floor Manager's monthly team
//! overview:
//! - Team and month banners
//! - FM Performance narrative
//! - Per-member attendance table (two physical rows per member, up to 15)
//! - Team Management / Goals / Team Overview / Additional Notes sections
//! - Chart data block feeding a clustered column chart (current vs previous
//!   month score per member)
//!
//! ## Layout
//!
//! ```text
//! C2:L2   Team banner          N2:X2   "<month> Overview" banner
//! B3:H3   FM Performance       N3:X3   Attendance headers
//! B4:H19  Narrative            N4:X33  Member blocks (2 rows each)
//! B23:H23 Team Management      N36     Chart anchor
//! B24:E39 Goals this month     N60:P75 Chart data block
//! F24:H39 Team Overview
//! B42:H58 Additional Notes
//! ```
//!
//! The chart data block sits below the visible report. It stays visible by
//! default: Excel drops series sourced from hidden rows unless the chart is
//! told otherwise. Callers that want the rows hidden opt in via
//! [`ReportRenderer::hide_chart_data`].
//!
//! rust_xlsxwriter is write-only, so an existing template is overlaid by
//! value: its first sheet is read with calamine and replayed into the fresh
//! worksheet before the report cells are written on top. The template's
//! sheet name is preserved.

use calamine::{open_workbook, Data, Reader, Xlsx};
use fmreport_core::{
    score_band, MemberRecord, RenderError, Renderer, ReportInput, BANNER_FILL, SECTION_FILL,
    SUBHEADER_FILL,
};
use rust_xlsxwriter::{
    Chart, ChartType, Format, FormatAlign, FormatBorder, Workbook, Worksheet,
};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Default sheet name when no template supplies one
const DEFAULT_SHEET_NAME: &str = "TEMPLATE";

/// First (0-indexed) row of the attendance table data area (A1 row 4)
const TABLE_FIRST_ROW: u32 = 3;

/// Name column span in the attendance table (N..P)
const NAME_FIRST_COL: u16 = 13;
const NAME_LAST_COL: u16 = 15;

/// Score column (Q)
const SCORE_COL: u16 = 16;

/// First attribute column (R); attributes run through X
const ATTR_FIRST_COL: u16 = 17;

/// Header row of the chart data block (A1 row 60)
const CHART_DATA_ROW: u32 = 59;

/// Chart data block columns (A1 N/O/P): member name, current score,
/// previous score
const CHART_NAME_COL: u16 = 13;
const CHART_SCORE_COL: u16 = 14;
const CHART_PREV_COL: u16 = 15;

/// Chart anchor cell (A1 "N36"), below the attendance table
const CHART_ANCHOR: (u32, u16) = (35, 13);

/// Chart size in pixels (original template uses an 18x10 cm frame)
const CHART_WIDTH: u32 = 680;
const CHART_HEIGHT: u32 = 378;

/// Column widths for the used range (narrow spacer columns included)
const COLUMN_WIDTHS: &[(u16, f64)] = &[
    (0, 3.0),
    (1, 12.0),
    (2, 12.0),
    (3, 12.0),
    (4, 12.0),
    (5, 12.0),
    (6, 12.0),
    (7, 12.0),
    (8, 3.0),
    (9, 3.0),
    (10, 3.0),
    (11, 3.0),
    (12, 3.0),
    (13, 12.0),
    (14, 6.0),
    (15, 6.0),
    (16, 8.0),
    (17, 8.0),
    (18, 8.0),
    (19, 8.0),
    (20, 8.0),
    (21, 8.0),
    (22, 8.0),
    (23, 12.0),
];

/// Excel monthly overview renderer
#[derive(Clone, Debug)]
pub struct ReportRenderer {
    /// Optional template workbook; overlaid by value when the path exists
    pub template: Option<PathBuf>,
    /// Sheet name used when no template supplies one
    pub sheet_name: String,
    /// Whether to hide the chart data rows below the report
    pub hide_chart_data: bool,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self {
            template: None,
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            hide_chart_data: false,
        }
    }
}

impl ReportRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the template workbook path. A path that does not exist is
    /// ignored, which is identical to not setting one.
    pub fn template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template = Some(path.into());
        self
    }

    /// Set the sheet name used when no template is applied
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Hide the chart data rows. Off by default to match the original
    /// template, where the block simply sits below the visible report.
    pub fn hide_chart_data(mut self) -> Self {
        self.hide_chart_data = true;
        self
    }

    /// Generate the report workbook as XLSX bytes
    pub fn render_to_bytes(&self, input: &ReportInput) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = Self::create_formats();

        let sheet = workbook.add_worksheet();

        // Template overlay first, so report cells win on collision
        let template_sheet = match &self.template {
            Some(path) if path.exists() => Self::apply_template(sheet, path)?,
            _ => None,
        };

        let name = template_sheet.unwrap_or_else(|| self.sheet_name.clone());
        sheet
            .set_name(name.as_str())
            .map_err(|e| RenderError::Workbook(e.to_string()))?;

        self.write_banners(sheet, input, &formats)?;
        self.write_narratives(sheet, input, &formats)?;
        self.write_attendance_headers(sheet, &formats)?;

        let members = input.members();
        self.write_member_blocks(sheet, members, &formats)?;
        self.write_chart_data(sheet, input, members)?;

        if !members.is_empty() {
            self.insert_chart(sheet, input, &name, members.len())?;
        }

        for &(col, width) in COLUMN_WIDTHS {
            sheet.set_column_width(col, width).ok();
        }

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Workbook(e.to_string()))?;

        Ok(buffer)
    }

    /// Render and persist the workbook, returning the output path
    pub fn save(&self, input: &ReportInput, path: impl AsRef<Path>) -> Result<PathBuf, RenderError> {
        let bytes = self.render_to_bytes(input)?;
        std::fs::write(path.as_ref(), bytes)?;
        Ok(path.as_ref().to_path_buf())
    }

    /// Create reusable formats
    fn create_formats() -> ReportFormats {
        let banner = Format::new()
            .set_bold()
            .set_font_size(14)
            .set_background_color(BANNER_FILL)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);

        let section_banner = Format::new().set_bold().set_background_color(BANNER_FILL);

        let section_header = Format::new().set_bold().set_background_color(SECTION_FILL);

        let sub_header = Format::new().set_bold().set_background_color(SUBHEADER_FILL);

        let table_header = Format::new()
            .set_bold()
            .set_font_size(9)
            .set_background_color(SECTION_FILL)
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap();

        let narrative = Format::new().set_text_wrap().set_align(FormatAlign::Top);

        let member_name = Format::new()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_border(FormatBorder::Thin);

        let score_base = Format::new()
            .set_bold()
            .set_font_size(12)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin);

        let attribute = Format::new()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin);

        ReportFormats {
            banner,
            section_banner,
            section_header,
            sub_header,
            table_header,
            narrative,
            member_name,
            score_base,
            attribute,
        }
    }

    /// Replay the template's first sheet (values only) and return its name
    fn apply_template(sheet: &mut Worksheet, path: &Path) -> Result<Option<String>, RenderError> {
        let mut workbook: Xlsx<BufReader<File>> =
            open_workbook(path).map_err(|e: calamine::XlsxError| RenderError::Template(e.to_string()))?;

        let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
            return Ok(None);
        };

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| RenderError::Template(e.to_string()))?;

        let start = range.start().unwrap_or((0, 0));
        for (r, row) in range.rows().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let row_num = start.0 + r as u32;
                let col_num = (start.1 + c as u32) as u16;

                match cell {
                    Data::Empty => {}
                    Data::Bool(b) => {
                        sheet
                            .write_boolean(row_num, col_num, *b)
                            .map_err(|e| RenderError::Workbook(e.to_string()))?;
                    }
                    Data::Int(i) => {
                        sheet
                            .write_number(row_num, col_num, *i as f64)
                            .map_err(|e| RenderError::Workbook(e.to_string()))?;
                    }
                    Data::Float(f) => {
                        sheet
                            .write_number(row_num, col_num, *f)
                            .map_err(|e| RenderError::Workbook(e.to_string()))?;
                    }
                    Data::DateTime(dt) => {
                        sheet
                            .write_number(row_num, col_num, dt.as_f64())
                            .map_err(|e| RenderError::Workbook(e.to_string()))?;
                    }
                    Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                        sheet
                            .write_string(row_num, col_num, s.as_str())
                            .map_err(|e| RenderError::Workbook(e.to_string()))?;
                    }
                    Data::Error(e) => {
                        sheet
                            .write_string(row_num, col_num, format!("#ERROR: {e:?}"))
                            .map_err(|e| RenderError::Workbook(e.to_string()))?;
                    }
                }
            }
        }

        Ok(Some(sheet_name))
    }

    /// Team banner (C2:L2) and month banner (N2:X2)
    fn write_banners(
        &self,
        sheet: &mut Worksheet,
        input: &ReportInput,
        formats: &ReportFormats,
    ) -> Result<(), RenderError> {
        sheet
            .merge_range(1, 2, 1, 11, &input.team_name, &formats.banner)
            .map_err(|e| RenderError::Workbook(e.to_string()))?;

        let month_overview = format!("{} Overview", input.month_name);
        sheet
            .merge_range(1, 13, 1, 23, &month_overview, &formats.banner)
            .map_err(|e| RenderError::Workbook(e.to_string()))?;

        Ok(())
    }

    /// Free-text sections: FM Performance, Team Management, Goals,
    /// Team Overview, Additional Notes
    fn write_narratives(
        &self,
        sheet: &mut Worksheet,
        input: &ReportInput,
        formats: &ReportFormats,
    ) -> Result<(), RenderError> {
        // FM Performance (B3:H3 header, B4:H19 body)
        sheet
            .merge_range(2, 1, 2, 7, "FM Performance", &formats.section_header)
            .map_err(|e| RenderError::Workbook(e.to_string()))?;
        sheet
            .merge_range(3, 1, 18, 7, &input.fm_performance, &formats.narrative)
            .map_err(|e| RenderError::Workbook(e.to_string()))?;

        // Team Management banner (B23:H23)
        sheet
            .merge_range(22, 1, 22, 7, "Team Management", &formats.section_banner)
            .map_err(|e| RenderError::Workbook(e.to_string()))?;

        // Goals this month (B24:E24 header, B25:E39 body)
        sheet
            .merge_range(23, 1, 23, 4, "Goals this month", &formats.sub_header)
            .map_err(|e| RenderError::Workbook(e.to_string()))?;
        sheet
            .merge_range(24, 1, 38, 4, &input.goals_this_month, &formats.narrative)
            .map_err(|e| RenderError::Workbook(e.to_string()))?;

        // Team Overview (F24:H24 header, F25:H39 body)
        sheet
            .merge_range(23, 5, 23, 7, "Team Overview", &formats.sub_header)
            .map_err(|e| RenderError::Workbook(e.to_string()))?;
        sheet
            .merge_range(24, 5, 38, 7, &input.team_overview, &formats.narrative)
            .map_err(|e| RenderError::Workbook(e.to_string()))?;

        // Additional Notes (B42:H42 banner, B43:H58 body)
        sheet
            .merge_range(41, 1, 41, 7, "Additional Notes", &formats.section_banner)
            .map_err(|e| RenderError::Workbook(e.to_string()))?;
        sheet
            .merge_range(42, 1, 57, 7, &input.additional_notes, &formats.narrative)
            .map_err(|e| RenderError::Workbook(e.to_string()))?;

        Ok(())
    }

    /// Attendance table header row (N3:X3). The score column header is
    /// deliberately blank, matching the template.
    fn write_attendance_headers(
        &self,
        sheet: &mut Worksheet,
        formats: &ReportFormats,
    ) -> Result<(), RenderError> {
        sheet
            .merge_range(2, NAME_FIRST_COL, 2, NAME_LAST_COL, "Name", &formats.table_header)
            .map_err(|e| RenderError::Workbook(e.to_string()))?;

        let headers = [
            "",
            "Mistakes",
            "Extra shifts",
            "Lateness",
            "Missed day",
            "Sick leave",
            "Attitude",
            "Remarks",
        ];
        for (offset, header) in headers.iter().enumerate() {
            let col = SCORE_COL + offset as u16;
            sheet
                .write_with_format(2, col, *header, &formats.table_header)
                .map_err(|e| RenderError::Workbook(e.to_string()))?;
        }

        Ok(())
    }

    /// Member blocks (N4:X33): two physical rows per member, every cell
    /// merged across the pair
    fn write_member_blocks(
        &self,
        sheet: &mut Worksheet,
        members: &[MemberRecord],
        formats: &ReportFormats,
    ) -> Result<(), RenderError> {
        for (i, member) in members.iter().enumerate() {
            let row = TABLE_FIRST_ROW + 2 * i as u32;

            sheet
                .merge_range(
                    row,
                    NAME_FIRST_COL,
                    row + 1,
                    NAME_LAST_COL,
                    &member.display_name(i),
                    &formats.member_name,
                )
                .map_err(|e| RenderError::Workbook(e.to_string()))?;

            // Score cell, filled by band (no fill at zero)
            let score_fmt = match score_band(member.score).fill() {
                Some(color) => formats.score_base.clone().set_background_color(color),
                None => formats.score_base.clone(),
            };
            sheet
                .merge_range(row, SCORE_COL, row + 1, SCORE_COL, "", &score_fmt)
                .map_err(|e| RenderError::Workbook(e.to_string()))?;
            sheet
                .write_number_with_format(row, SCORE_COL, member.score, &score_fmt)
                .map_err(|e| RenderError::Workbook(e.to_string()))?;

            // R..V: numeric attributes, zero renders as an empty cell
            let numerics = [
                member.mistakes,
                member.extra_shifts,
                member.lateness,
                member.missed_days,
                member.sick_leave,
            ];
            for (offset, value) in numerics.iter().enumerate() {
                let col = ATTR_FIRST_COL + offset as u16;
                sheet
                    .merge_range(row, col, row + 1, col, "", &formats.attribute)
                    .map_err(|e| RenderError::Workbook(e.to_string()))?;
                if *value != 0 {
                    sheet
                        .write_number_with_format(row, col, *value as f64, &formats.attribute)
                        .map_err(|e| RenderError::Workbook(e.to_string()))?;
                }
            }

            // W, X: attitude and remarks
            let texts = [member.attitude.as_str(), member.remarks.as_str()];
            for (offset, value) in texts.iter().enumerate() {
                let col = ATTR_FIRST_COL + numerics.len() as u16 + offset as u16;
                sheet
                    .merge_range(row, col, row + 1, col, value, &formats.attribute)
                    .map_err(|e| RenderError::Workbook(e.to_string()))?;
            }
        }

        Ok(())
    }

    /// Chart data block (from row 60): header plus one row per rendered
    /// member, in table order
    fn write_chart_data(
        &self,
        sheet: &mut Worksheet,
        input: &ReportInput,
        members: &[MemberRecord],
    ) -> Result<(), RenderError> {
        sheet
            .write_string(CHART_DATA_ROW, CHART_NAME_COL, "GP Name")
            .map_err(|e| RenderError::Workbook(e.to_string()))?;
        sheet
            .write_string(CHART_DATA_ROW, CHART_SCORE_COL, input.current_series_label())
            .map_err(|e| RenderError::Workbook(e.to_string()))?;
        sheet
            .write_string(CHART_DATA_ROW, CHART_PREV_COL, "Previous Month")
            .map_err(|e| RenderError::Workbook(e.to_string()))?;

        for (i, member) in members.iter().enumerate() {
            let row = CHART_DATA_ROW + 1 + i as u32;
            sheet
                .write_string(row, CHART_NAME_COL, member.display_name(i))
                .map_err(|e| RenderError::Workbook(e.to_string()))?;
            sheet
                .write_number(row, CHART_SCORE_COL, member.score)
                .map_err(|e| RenderError::Workbook(e.to_string()))?;
            sheet
                .write_number(row, CHART_PREV_COL, member.prev_score)
                .map_err(|e| RenderError::Workbook(e.to_string()))?;
        }

        if self.hide_chart_data {
            for i in 0..=members.len() as u32 {
                sheet.set_row_hidden(CHART_DATA_ROW + i).ok();
            }
        }

        Ok(())
    }

    /// Clustered column chart over the data block, anchored at N36
    fn insert_chart(
        &self,
        sheet: &mut Worksheet,
        input: &ReportInput,
        sheet_name: &str,
        member_count: usize,
    ) -> Result<(), RenderError> {
        let first_row = CHART_DATA_ROW + 1;
        let last_row = CHART_DATA_ROW + member_count as u32;

        let title = input.chart_title();
        let mut chart = Chart::new(ChartType::Column);
        chart.title().set_name(title.as_str());
        chart.y_axis().set_name("Score");
        chart.x_axis().set_name("Game Presenter");

        chart
            .add_series()
            .set_values((sheet_name, first_row, CHART_SCORE_COL, last_row, CHART_SCORE_COL))
            .set_categories((sheet_name, first_row, CHART_NAME_COL, last_row, CHART_NAME_COL))
            .set_name((sheet_name, CHART_DATA_ROW, CHART_SCORE_COL));

        chart
            .add_series()
            .set_values((sheet_name, first_row, CHART_PREV_COL, last_row, CHART_PREV_COL))
            .set_categories((sheet_name, first_row, CHART_NAME_COL, last_row, CHART_NAME_COL))
            .set_name((sheet_name, CHART_DATA_ROW, CHART_PREV_COL));

        chart.set_width(CHART_WIDTH).set_height(CHART_HEIGHT);

        sheet
            .insert_chart(CHART_ANCHOR.0, CHART_ANCHOR.1, &chart)
            .map_err(|e| RenderError::Workbook(e.to_string()))?;

        Ok(())
    }
}

impl Renderer for ReportRenderer {
    type Output = Vec<u8>;

    fn render(&self, input: &ReportInput) -> Result<Self::Output, RenderError> {
        self.render_to_bytes(input)
    }
}

/// Reusable cell formats for the report sheet
struct ReportFormats {
    banner: Format,
    section_banner: Format,
    section_header: Format,
    sub_header: Format,
    table_header: Format,
    narrative: Format,
    member_name: Format,
    score_base: Format,
    attribute: Format,
}
