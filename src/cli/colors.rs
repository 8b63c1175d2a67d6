//! The colors used by the command line, kept in one place so the output
//! stays consistent.
//!
//! - FERRUM_RED: message sources and highlighted arguments
//! - ID_GREY: record identifiers in listings

use colored::Color;

pub(crate) const FERRUM_RED: Color = Color::TrueColor {
    r: 255,
    g: 87,
    b: 87,
};

pub(crate) const ID_GREY: Color = Color::TrueColor {
    r: 150,
    g: 150,
    b: 150,
};
