//! # fmreport-render
//!
//! Rendering backend for fmreport team-performance reports.
//!
//! This crate provides the Excel report renderer: a fixed-layout monthly
//! overview sheet with banners, narrative sections, a two-row-per-member
//! attendance table, and an embedded clustered column chart comparing
//! current vs previous month scores.
//!
//! ## Example
//!
//! ```rust,ignore
//! use fmreport_core::resolve_input;
//! use fmreport_render::ReportRenderer;
//!
//! let input = resolve_input(r#"{"teamName":"Alpha","gpData":[]}"#)?;
//! let renderer = ReportRenderer::new();
//! let path = renderer.save(&input, "report.xlsx")?;
//! ```

pub mod excel;

pub use excel::ReportRenderer;
