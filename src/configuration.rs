pub trait Configuration: Clone + Send + Sync + 'static {
    /// SQLite database file; `None` selects the in-memory storage.
    fn database_path(&self) -> Option<String>;
    fn host(&self) -> String;
    fn port(&self) -> String;
}
