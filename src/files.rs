use camino::{Utf8Path, Utf8PathBuf};

/// True when `./name` is a regular file in the current working directory.
pub fn file_exists(name: &str) -> bool {
    file_exists_in(Utf8Path::new("."), name)
}

/// Same check, resolved against `dir` instead of the working directory.
/// `name` is always appended below `dir`, so absolute names do not escape it.
pub fn file_exists_in(dir: &Utf8Path, name: &str) -> bool {
    Utf8PathBuf::from(format!("{dir}/{name}")).is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir() -> Utf8PathBuf {
        let mut dir = std::env::temp_dir();
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        dir.push(format!("label-kit-files-{ts}"));
        Utf8PathBuf::from_path_buf(dir).unwrap()
    }

    #[test]
    fn regular_files_exist_directories_do_not() {
        let root = unique_temp_dir();
        fs::create_dir_all(root.join("labels").as_std_path()).unwrap();
        fs::write(root.join("qbo.json").as_std_path(), "{}").unwrap();

        assert!(file_exists_in(&root, "qbo.json"));
        assert!(!file_exists_in(&root, "labels"));
        assert!(!file_exists_in(&root, "missing.json"));

        let _ = fs::remove_dir_all(root.as_std_path());
    }

    #[test]
    fn absolute_names_stay_under_the_directory() {
        let root = unique_temp_dir();
        fs::create_dir_all(root.as_std_path()).unwrap();
        let config = root.join("qbo.json");
        fs::write(config.as_std_path(), "{}").unwrap();

        assert!(!file_exists_in(&root, config.as_str()));

        let cwd = std::env::current_dir().unwrap().join("Cargo.toml");
        assert!(cwd.is_file());
        assert!(!file_exists(cwd.to_str().unwrap()));

        let _ = fs::remove_dir_all(root.as_std_path());
    }

    #[test]
    fn working_directory_lookup() {
        assert!(file_exists("Cargo.toml"));
        assert!(!file_exists("src"));
        assert!(!file_exists("definitely-not-here.json"));
    }
}
