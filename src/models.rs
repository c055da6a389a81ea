use super::*;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct Collection {
    pub(crate) name: String,
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) author: String,
    #[serde(default)]
    pub(crate) hadith_count: usize,
    #[serde(default)]
    pub(crate) book_count: usize,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default)]
    pub(crate) grade: String,
}

impl Collection {
    fn new(name: &str, title: &str, author: &str, description: &str) -> Self {
        Collection {
            name: name.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            hadith_count: 0,
            book_count: 0,
            description: description.to_string(),
            grade: "Sahih".to_string(),
        }
    }
}

/// A chapter of a collection. Hadiths point at it through `chapter_id`,
/// which is not guaranteed to equal `book_number`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Book {
    pub(crate) book_number: u32,
    pub(crate) title: String,
    pub(crate) english_title: String,
    pub(crate) arabic_title: String,
    pub(crate) hadith_count: usize,
    pub(crate) chapter_id: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Hadith {
    pub(crate) hadith_number: u32,
    pub(crate) grade: String,
    pub(crate) arabic: String,
    pub(crate) english: String,
    pub(crate) narrator: String,
    pub(crate) chapter_id: u32,
    pub(crate) book_id: u32,
}

impl Hadith {
    pub(crate) fn grade_or_default(&self) -> &str {
        if self.grade.trim().is_empty() {
            DEFAULT_GRADE
        } else {
            &self.grade
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Paged<T> {
    pub(crate) items: Vec<T>,
    pub(crate) total: usize,
    pub(crate) page: u32,
    pub(crate) total_pages: u32,
}

impl<T: Clone> Paged<T> {
    pub(crate) fn empty(page: u32) -> Self {
        Paged {
            items: Vec::new(),
            total: 0,
            page: page.max(1),
            total_pages: 0,
        }
    }

    pub(crate) fn slice(all: &[T], page: u32, limit: usize) -> Self {
        let page = page.max(1);
        if limit == 0 {
            return Paged::empty(page);
        }
        let total = all.len();
        let total_pages = ((total + limit - 1) / limit) as u32;
        let start = (page as usize - 1).saturating_mul(limit);
        if start >= total {
            return Paged {
                items: Vec::new(),
                total,
                page,
                total_pages,
            };
        }
        let end = (start + limit).min(total);
        Paged {
            items: all[start..end].to_vec(),
            total,
            page,
            total_pages,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct RandomPick {
    pub(crate) hadith: Hadith,
    pub(crate) collection: Collection,
    pub(crate) book: Option<Book>,
}

pub(crate) fn default_collections() -> Vec<Collection> {
    vec![
        Collection::new(
            "bukhari",
            "Sahih al-Bukhari",
            "Imam al-Bukhari",
            "The most authentic collection of hadith",
        ),
        Collection::new(
            "muslim",
            "Sahih Muslim",
            "Imam Muslim",
            "The second most authentic collection",
        ),
        Collection::new(
            "abudawud",
            "Sunan Abu Dawood",
            "Abu Dawood",
            "Collection of hadith focusing on jurisprudential matters",
        ),
        Collection::new(
            "tirmidhi",
            "Jami' at-Tirmidhi",
            "Imam at-Tirmidhi",
            "Comprehensive collection of hadith",
        ),
        Collection::new(
            "nasai",
            "Sunan an-Nasa'i",
            "Imam an-Nasa'i",
            "Collection of hadith on jurisprudence",
        ),
        Collection::new(
            "ibnmajah",
            "Sunan Ibn Majah",
            "Ibn Majah",
            "Collection of hadith on jurisprudence",
        ),
    ]
}
