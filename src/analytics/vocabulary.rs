use std::collections::HashSet;

/// Ballet terms in English and Indonesian. Multi-word phrases never match a
/// single whitespace token; they are kept so the list reads as one glossary.
pub const BALLET_VOCABULARY: &[&str] = &[
    "ballet", "dancer", "dance", "performance", "rehearsal", "choreography", "balletic",
    "pirouette", "ballerina", "balletschool", "balletcompany", "pas", "tendu", "arabesque",
    "pointe", "pas de deux", "balletdance", "balletperformance", "balletclass", "danceacademy",
    "danceday", "balletshow", "balet", "penari", "tari", "pertunjukan", "latihan", "koreografi",
    "gerakan balet", "putaran", "sekolah balet", "perusahaan balet", "langkah", "ujung jari",
    "tari balet", "pertunjukan balet", "kelas balet", "akademi tari", "hari tari",
    "ballet klasik", "pentas balet", "gerak balet", "tarian balet", "komunitas balet",
    "pembelajaran balet", "pas ballerina", "karya balet",
];

/// Indonesian stop-words.
pub const INDONESIAN_STOP_WORDS: &[&str] = &[
    "ada", "adalah", "agar", "akan", "aku", "anda", "apa", "apakah", "atau", "bagaimana", "bagi",
    "bahwa", "banyak", "baru", "begitu", "belum", "berada", "berbagai", "bersama", "beberapa",
    "bisa", "boleh", "bukan", "dalam", "dan", "dapat", "dari", "demikian", "dengan", "di", "dia",
    "dilakukan", "dimana", "ga", "gimana", "hal", "hampir", "hanya", "harus", "hingga", "ia",
    "ini", "itu", "jadi", "jika", "juga", "kami", "kamu", "karena", "kata", "ke", "kecuali",
    "kepada", "ketika", "kita", "lagi", "lain", "lalu", "lebih", "maka", "mana", "masih",
    "melalui", "membuat", "mendapat", "menjadi", "menurut", "mereka", "namun", "oleh", "pada",
    "para", "pula", "saat", "sambil", "sampai", "sangat", "saya", "sebagai", "sebelum",
    "sebuah", "sedang", "sedangkan", "sehingga", "sejak", "selain", "selama", "sembari",
    "sementara", "sempat", "seorang", "seperti", "serta", "setelah", "si", "sudah", "tanpa",
    "tapi", "telah", "tentang", "tersebut", "tetapi", "tidak", "untuk", "yaitu", "yakni",
    "yang",
];

/// Characters stripped from both ends of each title token.
const STRIP_CHARS: &[char] = &[
    '.', ',', '!', '?', '(', ')', '[', ']', '{', '}', ':', ';', '"', '\'',
];

/// Keeps title tokens that are in the vocabulary and not stop-words.
#[derive(Debug, Clone)]
pub struct WordFilter {
    vocabulary: HashSet<String>,
    stop_words: HashSet<String>,
}

impl WordFilter {
    pub fn new<V, S>(vocabulary: V, stop_words: S) -> Self
    where
        V: IntoIterator,
        V::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            vocabulary: vocabulary.into_iter().map(Into::into).collect(),
            stop_words: stop_words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn ballet() -> Self {
        Self::new(
            BALLET_VOCABULARY.iter().copied(),
            INDONESIAN_STOP_WORDS.iter().copied(),
        )
    }

    /// Surviving tokens of `title`, in order, duplicates kept.
    pub fn tokens<'a>(&'a self, title: &str) -> impl Iterator<Item = String> + 'a {
        title
            .to_lowercase()
            .split_whitespace()
            .map(|word| word.trim_matches(STRIP_CHARS).to_string())
            .collect::<Vec<_>>()
            .into_iter()
            .filter(move |word| self.accepts(word))
    }

    fn accepts(&self, word: &str) -> bool {
        !word.is_empty() && !self.stop_words.contains(word) && self.vocabulary.contains(word)
    }
}

impl Default for WordFilter {
    fn default() -> Self {
        Self::ballet()
    }
}
