//! Pronounceability filter and exclusion list

use std::collections::HashSet;

pub const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];

/// Every non-vowel letter, `y` included
pub const CONSONANTS: &[char] = &[
    'b', 'c', 'd', 'f', 'g', 'h', 'j', 'k', 'l', 'm', 'n',
    'p', 'q', 'r', 's', 't', 'v', 'w', 'x', 'y', 'z',
];

pub const LETTERS: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm',
    'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

pub const DIGITS: &[char] = &['1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// Letter pairs that are awkward to say
const AWKWARD_PAIRS: &[&str] = &["qx", "qz", "xq", "zq", "wx", "xw", "vx", "xv"];

/// Common English words: almost certainly registered already
const COMMON_WORDS: &[&str] = &[
    "ace", "act", "add", "age", "ago", "aid", "aim", "air", "all", "and", "ant", "any", "ape",
    "arc", "are", "ark", "arm", "art", "ask", "ate", "bad", "bag", "ban", "bar", "bat", "bay",
    "bed", "bee", "bet", "bid", "big", "bin", "bit", "box", "boy", "bug", "bus", "but", "buy",
    "cab", "cam", "can", "cap", "car", "cat", "cob", "cod", "cop", "cot", "cow", "cry", "cub",
    "cup", "cut", "dad", "dam", "day", "den", "dew", "did", "die", "dig", "dim", "dip", "dog",
    "dot", "dry", "dub", "dud", "due", "dug", "duo", "ear", "eat", "eel", "egg", "ego", "elf",
    "elk", "elm", "emu", "end", "era", "eve", "eye", "fad", "fan", "far", "fat", "fax", "fee",
    "few", "fig", "fin", "fir", "fit", "fix", "fly", "foe", "fog", "for", "fox", "fry", "fun",
    "fur", "gag", "gap", "gas", "gel", "gem", "get", "god", "got", "gum", "gun", "gut", "guy",
    "gym", "had", "ham", "has", "hat", "hay", "hen", "her", "hew", "hex", "hey", "hid", "him",
    "hip", "his", "hit", "hog", "hop", "hot", "how", "hub", "hue", "hug", "hum", "hut", "ice",
    "icy", "ill", "imp", "ink", "inn", "ion", "its", "ivy", "jab", "jag", "jam", "jar", "jaw",
    "jay", "jet", "jig", "job", "jog", "joy", "jug", "ken", "key", "kid", "kin", "kit", "lab",
    "lad", "lag", "lap", "law", "lax", "lay", "lea", "led", "leg", "let", "lid", "lie", "lip",
    "lit", "log", "lot", "low", "lux", "mad", "man", "map", "mat", "max", "may", "men", "met",
    "mid", "mix", "mob", "mod", "mom", "mop", "mud", "mug", "nab", "nag", "nap", "nav", "nay",
    "net", "new", "nil", "nit", "nod", "nor", "not", "now", "nun", "nut", "oak", "oar", "oat",
    "odd", "off", "oft", "oil", "old", "one", "opt", "orb", "ore", "our", "out", "owe", "owl",
    "own", "pad", "pal", "pan", "par", "pat", "paw", "pax", "pay", "pea", "peg", "pen", "pep",
    "per", "pet", "pie", "pig", "pin", "pit", "pod", "pop", "pot", "pry", "pub", "pug", "pun",
    "pup", "put", "rad", "rag", "ram", "ran", "rap", "rat", "raw", "ray", "red", "ref", "rep",
    "rev", "rib", "rid", "rig", "rim", "rip", "rob", "rod", "roe", "rot", "row", "rub", "rug",
    "rum", "run", "rut", "rye", "sac", "sad", "sag", "sap", "sat", "saw", "sax", "say", "sea",
    "see", "set", "sew", "shy", "sin", "sip", "sir", "sis", "sit", "six", "ska", "ski", "sky",
    "sly", "sob", "sod", "son", "sop", "sow", "sox", "soy", "spa", "spy", "sub", "sum", "sun",
    "sup", "tab", "tad", "tag", "tan", "tap", "tar", "tat", "tax", "tea", "tee", "ten", "the",
    "thy", "tic", "tie", "tin", "tip", "toe", "ton", "too", "top", "tot", "tow", "toy", "try",
    "tub", "tug", "two", "ump", "urn", "use", "van", "var", "vat", "vet", "via", "vie", "vow",
    "wad", "wag", "wan", "war", "was", "wax", "way", "web", "wed", "wee", "wet", "who", "why",
    "wig", "win", "wit", "woe", "wok", "won", "woo", "wow", "yak", "yam", "yap", "yaw", "yea",
    "yes", "yet", "yew", "yon", "you", "yow", "zap", "zen", "zip", "zoo",
];

/// Tech acronyms and jargon
const TECH_WORDS: &[&str] = &[
    "api", "app", "bot", "cpu", "dev", "dns", "git", "gpu", "hub", "lan", "net", "ops", "ram",
    "sdk", "sql", "ssh", "ssl", "tcp", "tls", "udp", "url", "usb", "wan", "web", "wifi", "aws",
    "cdn", "cli", "cms", "css", "dom", "ftp", "gui", "html", "http", "ide", "imap", "jpeg", "json",
    "node", "npm", "php", "rest", "smtp", "soap", "unix", "yaml",
];

/// Common first names
const COMMON_NAMES: &[&str] = &[
    "bob", "dan", "don", "ian", "jay", "jim", "joe", "jon", "ken", "kim", "lee", "len", "lou",
    "max", "meg", "pam", "pat", "ray", "rob", "ron", "roy", "sam", "sue", "ted", "tim", "tom",
    "vic",
];

pub fn is_vowel(c: char) -> bool {
    VOWELS.contains(&c)
}

pub fn is_consonant(c: char) -> bool {
    CONSONANTS.contains(&c)
}

/// Reasonably pronounceable: has a vowel, is not all consonants, and
/// contains no awkward letter pair.
pub fn is_pronounceable(s: &str) -> bool {
    if !s.chars().any(is_vowel) {
        return false;
    }
    if s.chars().all(is_consonant) {
        return false;
    }
    !AWKWARD_PAIRS.iter().any(|pair| s.contains(pair))
}

/// Words that should never be emitted as candidates
#[derive(Debug, Clone)]
pub struct ExclusionList {
    words: HashSet<String>,
}

impl ExclusionList {
    /// Common words, tech jargon and first names
    pub fn builtin() -> Self {
        let words = COMMON_WORDS
            .iter()
            .chain(TECH_WORDS)
            .chain(COMMON_NAMES)
            .map(|w| w.to_string())
            .collect();
        Self { words }
    }

    pub fn empty() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    /// Add caller-supplied words (lowercased, trimmed)
    pub fn with_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words.extend(
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty()),
        );
        self
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for ExclusionList {
    fn default() -> Self {
        Self::builtin()
    }
}
