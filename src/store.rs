use super::*;

#[derive(Error, Debug)]
pub(crate) enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug)]
pub(crate) struct Catalog {
    pub(crate) collections: Vec<Collection>,
    pub(crate) random_collections: Vec<String>,
    pub(crate) fallback_collection: String,
}

impl Default for Catalog {
    fn default() -> Self {
        let collections = default_collections();
        let random_collections = collections.iter().map(|c| c.name.clone()).collect();
        Catalog {
            collections,
            random_collections,
            fallback_collection: "bukhari".to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RawCorpus {
    #[serde(default)]
    chapters: Vec<RawChapter>,
    #[serde(default)]
    hadiths: Vec<RawHadith>,
}

#[derive(Deserialize)]
struct RawChapter {
    #[serde(default)]
    id: Option<u32>,
    #[serde(default, rename = "bookId")]
    book_id: Option<u32>,
    #[serde(default)]
    english: Option<String>,
    #[serde(default)]
    arabic: Option<String>,
}

#[derive(Deserialize)]
struct RawHadith {
    #[serde(default, rename = "idInBook")]
    id_in_book: Option<u32>,
    #[serde(default, rename = "chapterId")]
    chapter_id: Option<u32>,
    #[serde(default, rename = "bookId")]
    book_id: Option<u32>,
    #[serde(default)]
    grade: Option<String>,
    #[serde(default)]
    arabic: Option<String>,
    #[serde(default)]
    english: Option<RawEnglish>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEnglish {
    Text(String),
    Detailed {
        #[serde(default)]
        narrator: Option<String>,
        #[serde(default)]
        text: Option<String>,
    },
}

impl RawChapter {
    fn into_book(self) -> Book {
        let chapter_id = self.id.unwrap_or(0);
        let english = self.english.unwrap_or_default();
        Book {
            book_number: self.book_id.unwrap_or(chapter_id),
            title: english.clone(),
            english_title: english,
            arabic_title: self.arabic.unwrap_or_default(),
            hadith_count: 0,
            chapter_id,
        }
    }
}

impl RawHadith {
    fn into_hadith(self) -> Hadith {
        let (english, narrator) = match self.english {
            Some(RawEnglish::Text(text)) => (text, String::new()),
            Some(RawEnglish::Detailed { narrator, text }) => {
                (text.unwrap_or_default(), narrator.unwrap_or_default())
            }
            None => (String::new(), String::new()),
        };
        let grade = match self.grade {
            Some(grade) if !grade.trim().is_empty() => grade,
            _ => DEFAULT_GRADE.to_string(),
        };
        Hadith {
            hadith_number: self.id_in_book.unwrap_or(0),
            grade,
            arabic: self.arabic.unwrap_or_default(),
            english,
            narrator,
            chapter_id: self.chapter_id.unwrap_or(0),
            book_id: self.book_id.unwrap_or(0),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct CollectionStore {
    collections: Vec<Collection>,
    books: HashMap<String, Vec<Book>>,
    hadiths: HashMap<String, Vec<Hadith>>,
    random_collections: Vec<String>,
    fallback_collection: String,
}

impl CollectionStore {
    pub(crate) fn new(catalog: Catalog) -> Self {
        CollectionStore {
            collections: catalog.collections,
            books: HashMap::new(),
            hadiths: HashMap::new(),
            random_collections: catalog.random_collections,
            fallback_collection: catalog.fallback_collection,
        }
    }

    pub(crate) fn load(data_dir: &Path, catalog: Catalog) -> Self {
        let mut store = CollectionStore::new(catalog);
        let names: Vec<String> = store.collections.iter().map(|c| c.name.clone()).collect();
        for name in names {
            let path = data_dir.join(format!("{}.json", name));
            if !path.exists() {
                debug!("no corpus file for {} at {}", name, path.display());
                continue;
            }
            match read_corpus_file(&path) {
                Ok((books, hadiths)) => {
                    info!(
                        "loaded {}: {} books, {} hadiths",
                        name,
                        books.len(),
                        hadiths.len()
                    );
                    store.insert_corpus(&name, books, hadiths);
                }
                Err(err) => {
                    warn!("skipping corpus file {}: {}", path.display(), err);
                }
            }
        }
        store
    }

    pub(crate) fn insert_corpus(&mut self, name: &str, mut books: Vec<Book>, hadiths: Vec<Hadith>) {
        for book in books.iter_mut() {
            book.hadith_count = hadiths
                .iter()
                .filter(|h| h.chapter_id == book.chapter_id)
                .count();
        }
        if let Some(collection) = self.collections.iter_mut().find(|c| c.name == name) {
            collection.book_count = books.len();
            collection.hadith_count = hadiths.len();
        }
        self.books.insert(name.to_string(), books);
        self.hadiths.insert(name.to_string(), hadiths);
    }

    pub(crate) fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub(crate) fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.name == name)
    }

    pub(crate) fn display_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.collection(name).map(|c| c.title.as_str()).unwrap_or(name)
    }

    pub(crate) fn books(&self, collection: &str) -> &[Book] {
        self.books
            .get(collection)
            .map(|books| books.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn book(&self, collection: &str, book_number: u32) -> Option<&Book> {
        self.books(collection)
            .iter()
            .find(|b| b.book_number == book_number)
    }

    pub(crate) fn hadiths(
        &self,
        collection: &str,
        book_number: u32,
        page: u32,
        limit: usize,
    ) -> Paged<Hadith> {
        let Some(all) = self.hadiths.get(collection) else {
            return Paged::empty(page);
        };
        if book_number == 0 {
            return Paged::slice(all, page, limit);
        }
        let chapter_id = self
            .book(collection, book_number)
            .map(|b| b.chapter_id)
            .unwrap_or(book_number);
        let filtered: Vec<Hadith> = all
            .iter()
            .filter(|h| h.chapter_id == chapter_id)
            .cloned()
            .collect();
        Paged::slice(&filtered, page, limit)
    }

    // English and narrator match case-insensitively; Arabic is compared as-is.
    pub(crate) fn search_hadiths(&self, query: &str, page: u32, limit: usize) -> Paged<Hadith> {
        let page = page.max(1);
        let limit = if (1..=MAX_SEARCH_LIMIT).contains(&limit) {
            limit
        } else {
            DEFAULT_SEARCH_LIMIT
        };
        let needle = query.trim();
        if needle.is_empty() {
            return Paged::empty(page);
        }
        let lowered = needle.to_lowercase();

        let mut results = Vec::new();
        for collection in &self.collections {
            let Some(hadiths) = self.hadiths.get(&collection.name) else {
                continue;
            };
            results.extend(
                hadiths
                    .iter()
                    .filter(|h| {
                        h.english.to_lowercase().contains(&lowered)
                            || h.arabic.contains(needle)
                            || h.narrator.to_lowercase().contains(&lowered)
                    })
                    .cloned(),
            );
        }
        Paged::slice(&results, page, limit)
    }

    pub(crate) fn random_hadith(&self) -> Option<RandomPick> {
        self.random_hadith_with(&mut rand::thread_rng())
    }

    /// Picks a collection from the preferred set (or any collection when none
    /// of those has hadiths), then a uniformly random hadith inside it.
    pub(crate) fn random_hadith_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<RandomPick> {
        let has_hadiths = |c: &&Collection| {
            self.hadiths
                .get(&c.name)
                .map(|h| !h.is_empty())
                .unwrap_or(false)
        };
        let mut candidates: Vec<&Collection> = self
            .random_collections
            .iter()
            .filter_map(|name| self.collection(name))
            .filter(has_hadiths)
            .collect();
        if candidates.is_empty() {
            candidates = self.collections.iter().filter(has_hadiths).collect();
        }
        let collection = *candidates.choose(rng)?;
        let hadith = self.hadiths.get(&collection.name)?.choose(rng)?;
        let book = self.book_for_hadith(&collection.name, hadith).cloned();
        Some(RandomPick {
            hadith: hadith.clone(),
            collection: collection.clone(),
            book,
        })
    }

    /// Hadith `hadith_number` of one book. Numbers restart in every book, so
    /// only `book_number == 0` falls back to the first match across books.
    pub(crate) fn find_hadith(
        &self,
        collection: &str,
        book_number: u32,
        hadith_number: u32,
    ) -> (Option<&Hadith>, Option<&Book>) {
        if book_number == 0 {
            return self.find_hadith_by_number(collection, hadith_number);
        }
        let Some(hadiths) = self.hadiths.get(collection) else {
            return (None, None);
        };
        let book = self.book(collection, book_number);
        let chapter_id = book.map(|b| b.chapter_id).unwrap_or(book_number);
        let hadith = hadiths
            .iter()
            .find(|h| h.chapter_id == chapter_id && h.hadith_number == hadith_number);
        match hadith {
            Some(hadith) => (Some(hadith), book),
            None => (None, None),
        }
    }

    pub(crate) fn book_for_hadith(&self, collection: &str, hadith: &Hadith) -> Option<&Book> {
        self.books(collection)
            .iter()
            .find(|b| b.chapter_id == hadith.chapter_id)
    }

    pub(crate) fn find_hadith_by_number(
        &self,
        collection: &str,
        hadith_number: u32,
    ) -> (Option<&Hadith>, Option<&Book>) {
        let Some(hadiths) = self.hadiths.get(collection) else {
            return (None, None);
        };
        for book in self.books(collection) {
            if let Some(hadith) = hadiths
                .iter()
                .find(|h| h.chapter_id == book.chapter_id && h.hadith_number == hadith_number)
            {
                return (Some(hadith), Some(book));
            }
        }
        let orphan = hadiths.iter().find(|h| h.hadith_number == hadith_number);
        (orphan, None)
    }

    // Unmatched hits go to the fallback collection.
    pub(crate) fn find_collection_for_hadith(&self, hadith: &Hadith) -> &str {
        for collection in &self.collections {
            if self
                .books(&collection.name)
                .iter()
                .any(|b| b.chapter_id == hadith.chapter_id)
            {
                return &collection.name;
            }
        }
        &self.fallback_collection
    }
}

fn read_corpus_file(path: &Path) -> Result<(Vec<Book>, Vec<Hadith>), LoadError> {
    let contents = fs::read_to_string(path)?;
    let raw: RawCorpus = serde_json::from_str(&contents)?;
    let books = raw.chapters.into_iter().map(RawChapter::into_book).collect();
    let hadiths = raw.hadiths.into_iter().map(RawHadith::into_hadith).collect();
    Ok((books, hadiths))
}
