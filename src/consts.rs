/// Last visit not older than this many days is shown as recent.
pub const RECENT_VISIT_DAYS: i64 = 7;
/// Last visit not older than this many days is shown as a warning.
pub const WARNING_VISIT_DAYS: i64 = 30;

pub const MONTHS_SHORT_ES: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];
