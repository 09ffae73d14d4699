//! A data root on disk shared by the command tests.

use std::fs;

use lectern::storage::{BIBLE_DIR, HYMNAL_DIR};
use tempfile::TempDir;

use super::Context;

const ENGLISH: &str = r#"{"bible": [{"testament": "Old", "books": [
    {"book_name": "Genesis", "chapters": [
        {"chapter_number": 1, "verses": [
            {"verse_number": 1, "text": "In the beginning God created the heaven and the earth.", "title": "The Creation"},
            {"verse_number": 2, "text": "And the earth was without form, and void."},
            {"verse_number": 3, "text": "And God said, Let there be light."}
        ]},
        {"chapter_number": 2, "verses": [
            {"verse_number": 1, "text": "Thus the heavens and the earth were finished."}
        ]}
    ]},
    {"book_name": "Exodus", "chapters": [
        {"chapter_number": 1, "verses": [
            {"verse_number": 1, "text": "Now these are the names of the children of Israel."}
        ]},
        {"chapter_number": 5, "verses": [
            {"verse_number": 1, "text": "And afterward Moses and Aaron went in."},
            {"verse_number": 2, "text": "And Pharaoh said, Who is the LORD?"}
        ]}
    ]}
]}]}"#;

const FRENCH: &str = r#"{"bible": [{"testament": "Ancien", "books": [
    {"book_name": "Genèse", "chapters": [
        {"chapter_number": 1, "verses": [
            {"verse_number": 1, "text": "Au commencement, Dieu créa les cieux et la terre."}
        ]}
    ]}
]}]}"#;

/// One hymn per category, with a refrain.
fn hymns(category: &str) -> String {
    let key = category.to_lowercase();
    format!(
        r#"{{"{key}_1": {{"laharana": 1, "lohateny": "Ry Tompo o", "hira": [
            {{"andininy": 1, "tononkira": "Ry Tompo o, mihaino anay", "fiverenany": false}},
            {{"andininy": 2, "tononkira": "Haleloia, haleloia", "fiverenany": true}}
        ]}}}}"#
    )
}

/// A data root with English and French corpora and every default hymnal
/// category, but no configuration file.
pub fn data_root() -> TempDir {
    let tmp = tempfile::tempdir().unwrap();
    let bible = tmp.path().join(BIBLE_DIR);
    let hymnal = tmp.path().join(HYMNAL_DIR);
    fs::create_dir_all(&bible).unwrap();
    fs::create_dir_all(&hymnal).unwrap();

    fs::write(bible.join("bible_en.json"), ENGLISH).unwrap();
    fs::write(bible.join("bible_fr.json"), FRENCH).unwrap();
    for category in ["ff", "FFPM", "antema", "tsanta"] {
        fs::write(hymnal.join(format!("{category}.json")), hymns(category)).unwrap();
    }
    tmp
}

/// A command context over `root` reading `language`.
pub fn context(root: &TempDir, language: &str) -> Context {
    Context::new(root.path().to_path_buf(), Some(language.to_string()))
}
