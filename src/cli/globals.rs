use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub url: String,
    pub storage_dir: PathBuf,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(url: String, storage_dir: PathBuf) -> Self {
        Self { url, storage_dir }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new(
            "http://localhost:8000".to_string(),
            PathBuf::from(".webcom"),
        );
        assert_eq!(args.url, "http://localhost:8000");
        assert_eq!(args.storage_dir, PathBuf::from(".webcom"));
    }
}
