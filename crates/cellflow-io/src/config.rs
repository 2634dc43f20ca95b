/// Output rendering of the Value Board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Padded table with a column-letter legend and two-digit row numbers.
    #[default]
    Table,
    /// Pretty-printed JSON document.
    Json,
}

#[derive(Clone, Debug)]
pub struct IoConfig {
    /// Field delimiter as a single byte.
    pub delimiter: u8,
    pub format: OutputFormat,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            delimiter: b'|',
            format: OutputFormat::Table,
        }
    }
}
