use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn recursion_limit(&self) -> usize;
    fn missing_file(&self) -> &str;
    /// Probe names to run; empty means the whole catalog.
    fn selected_probes(&self) -> &[String];
    fn strict(&self) -> bool;
}
