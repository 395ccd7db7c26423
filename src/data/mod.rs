/// Data layer: core types, loading, and statistics.
///
/// Architecture:
/// ```text
///  .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Table (required columns checked)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table   │  Vec<Row>, shared column set
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats   │  difference, group_by, aggregate
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod stats;

#[cfg(test)]
pub(crate) mod fixtures {
    use super::loader::parse_json;
    use super::model::Table;

    pub const THREE_ROOMS_JSON: &str = r#"[
        {"gt_corners": 4, "rb_corners": 4, "ceiling_max": 3.5, "ceiling_mean": 1.5, "ceiling_min": 0.5,
         "floor_max": 10, "floor_mean": 10, "floor_min": 2.0},
        {"gt_corners": 4, "rb_corners": 5, "ceiling_max": 5.5, "ceiling_mean": 2.5, "ceiling_min": 0.5,
         "floor_max": 14, "floor_mean": 12, "floor_min": 4.0},
        {"gt_corners": 5, "rb_corners": 5, "ceiling_max": 8.0, "ceiling_mean": 4.0, "ceiling_min": 1.0,
         "floor_max": 12, "floor_mean": 14, "floor_min": 3.0}
    ]"#;

    pub fn three_room_table() -> Table {
        parse_json(THREE_ROOMS_JSON).expect("fixture parses")
    }
}
