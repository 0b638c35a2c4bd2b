//! Example configuration types generated by inigen.
//!
//! [`MyIniFile`] is generated from `config.schema` and reads a custom
//! [`Color`] field; [`DateRangeConfig`] is generated from `date_range.schema`.

mod color;

pub use color::{Color, ParseColorError};

mod generated {
    use crate::Color;

    include!(concat!(env!("OUT_DIR"), "/my_ini_file.rs"));
    include!(concat!(env!("OUT_DIR"), "/date_range_config.rs"));
}

pub use generated::{DateRangeConfig, MyIniFile};
