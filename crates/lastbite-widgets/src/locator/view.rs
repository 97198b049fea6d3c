/// The locator's page elements outside the map: the loading indicator, the
/// error banner and the visible store count.
pub trait LocatorView {
    /// Shows the loading indicator in place of the map, or the map in
    /// place of the indicator.
    fn set_loading(&self, loading: bool);

    fn show_error(&self, message: &str);

    fn hide_error(&self);

    fn set_store_count(&self, label: &str);
}

/// `"1 store"`, `"3 stores"`.
#[must_use]
pub fn store_count_label(count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} store{plural}")
}
