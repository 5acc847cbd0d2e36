//! Rule-based NER backend: gazetteers plus surface patterns.
//!
//! No model files or external processes. Precision is good on well-known
//! names; recall on unseen organisations and places is limited to what the
//! suffix and capitalisation patterns catch.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::backend::{Entity, NerBackend, NerError};

/// Rule-based NER backend with OntoNotes-style labels.
pub struct RuleNerBackend;

impl RuleNerBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RuleNerBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl NerBackend for RuleNerBackend {
    fn backend_id(&self) -> &str {
        "rules"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn extract(&self, text: &str) -> Result<Vec<Entity>, NerError> {
        let mut candidates = Vec::new();

        collect_gazetteer(text, &ORG_GAZETTEER, "ORG", &mut candidates);
        collect_gazetteer(text, &GPE_GAZETTEER, "GPE", &mut candidates);
        collect_gazetteer(text, &LOC_GAZETTEER, "LOC", &mut candidates);
        collect_pattern(text, &ORG_SUFFIX, "ORG", Priority::Strong, &mut candidates);
        collect_pattern(text, &ORG_OF, "ORG", Priority::Strong, &mut candidates);
        collect_pattern(text, &LOC_FEATURE, "LOC", Priority::Strong, &mut candidates);
        collect_pattern(text, &MONEY, "MONEY", Priority::Strong, &mut candidates);
        collect_pattern(text, &PERCENT, "PERCENT", Priority::Strong, &mut candidates);
        for pattern in DATE_PATTERNS.iter() {
            collect_pattern(text, pattern, "DATE", Priority::Strong, &mut candidates);
        }
        collect_pattern(text, &YEAR, "DATE", Priority::Titled, &mut candidates);
        collect_titled_persons(text, &mut candidates);
        collect_capitalized_persons(text, &mut candidates);

        Ok(resolve(text, candidates))
    }
}

/// How strongly a rule's evidence counts when spans overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Priority {
    /// Bare capitalisation.
    Weak = 1,
    /// Honorific or title in front of a name.
    Titled = 2,
    /// Gazetteer hit or an unambiguous surface form.
    Strong = 3,
}

#[derive(Debug, Clone)]
struct Candidate {
    start: usize,
    end: usize,
    label: &'static str,
    priority: Priority,
}

impl Candidate {
    fn len(&self) -> usize {
        self.end - self.start
    }

    fn overlaps(&self, other: &Candidate) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Pick a non-overlapping set of spans (strongest, then longest, then
/// earliest) and return them in text order.
fn resolve(text: &str, mut candidates: Vec<Candidate>) -> Vec<Entity> {
    candidates.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then(b.len().cmp(&a.len()))
            .then(a.start.cmp(&b.start))
    });

    let mut accepted: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        if !accepted.iter().any(|a| a.overlaps(&candidate)) {
            accepted.push(candidate);
        }
    }
    accepted.sort_by_key(|c| c.start);

    accepted
        .into_iter()
        .map(|c| Entity {
            text: text[c.start..c.end].to_string(),
            label: c.label.to_string(),
            start: Some(c.start),
        })
        .collect()
}

fn collect_gazetteer(
    text: &str,
    gazetteer: &Regex,
    label: &'static str,
    out: &mut Vec<Candidate>,
) {
    collect_pattern(text, gazetteer, label, Priority::Strong, out);
}

fn collect_pattern(
    text: &str,
    pattern: &Regex,
    label: &'static str,
    priority: Priority,
    out: &mut Vec<Candidate>,
) {
    out.extend(pattern.find_iter(text).map(|m| Candidate {
        start: m.start(),
        end: m.end(),
        label,
        priority,
    }));
}

fn collect_titled_persons(text: &str, out: &mut Vec<Candidate>) {
    for cap in TITLED_NAME.captures_iter(text) {
        if let Some(name) = cap.get(1) {
            out.push(Candidate {
                start: name.start(),
                end: name.end(),
                label: "PERSON",
                priority: Priority::Titled,
            });
        }
    }
}

fn collect_capitalized_persons(text: &str, out: &mut Vec<Candidate>) {
    for m in CAPITALIZED_NAME.find_iter(text) {
        let mut start = m.start();
        let span = m.as_str();

        // Drop sentence-initial function words ("The", "After", ...).
        let mut tokens: Vec<(usize, &str)> = span
            .split_whitespace()
            .map(|tok| {
                let offset = tok.as_ptr() as usize - span.as_ptr() as usize;
                (offset, tok)
            })
            .collect();
        while let Some(&(_, first)) = tokens.first() {
            if LEADING_STOPWORDS.contains(first) {
                tokens.remove(0);
            } else {
                break;
            }
        }
        if tokens.len() < 2 || tokens.iter().any(|(_, t)| NON_NAME_TOKENS.contains(*t)) {
            continue;
        }

        start += tokens[0].0;
        out.push(Candidate {
            start,
            end: m.end(),
            label: "PERSON",
            priority: Priority::Weak,
        });
    }
}

/// Build a word-bounded alternation, longest entries first so the regex
/// prefers "New York City" over "New York".
fn gazetteer_regex(entries: &[&str]) -> Regex {
    let mut sorted: Vec<&str> = entries.to_vec();
    sorted.sort_by_key(|e| std::cmp::Reverse(e.len()));
    let alternation = sorted
        .iter()
        .map(|e| regex::escape(e))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{})\b", alternation)).expect("gazetteer pattern should compile")
}

// ============================================================================
// Gazetteers
// ============================================================================

static ORG_GAZETTEER: LazyLock<Regex> = LazyLock::new(|| {
    gazetteer_regex(&[
        "Apple", "Google", "Alphabet", "Microsoft", "Amazon", "Meta", "Facebook", "Netflix",
        "Tesla", "SpaceX", "IBM", "Intel", "Nvidia", "NVIDIA", "AMD", "Oracle", "Samsung",
        "Sony", "Toyota", "Honda", "Ford", "General Motors", "Boeing", "Airbus", "Walmart",
        "Disney", "Coca-Cola", "PepsiCo", "Nike", "Adobe", "Salesforce", "Twitter", "OpenAI",
        "Uber", "Airbnb", "Spotify", "Goldman Sachs", "JPMorgan", "Morgan Stanley",
        "Pfizer", "Moderna", "Siemens", "Volkswagen", "BMW", "Huawei", "Alibaba", "Tencent",
        "Harvard", "Stanford", "MIT", "Yale", "Princeton", "Oxford", "Cambridge",
        "NASA", "FBI", "CIA", "NSA", "NATO", "UNESCO", "UNICEF", "United Nations",
        "European Union", "World Health Organization", "World Bank",
        "International Monetary Fund", "IMF", "Red Cross", "Congress", "Senate",
        "Supreme Court", "Pentagon", "Federal Reserve", "BBC", "CNN", "Reuters",
        "New York Times", "Washington Post",
    ])
});

static GPE_GAZETTEER: LazyLock<Regex> = LazyLock::new(|| {
    gazetteer_regex(&[
        // Countries
        "United States", "United States of America", "USA", "America", "Canada", "Mexico",
        "Brazil", "Argentina", "Chile", "Peru", "Colombia", "Venezuela", "Cuba",
        "United Kingdom", "UK", "Britain", "England", "Scotland", "Wales", "Ireland", "France",
        "Germany", "Spain", "Portugal", "Italy", "Netherlands", "Belgium", "Switzerland",
        "Austria", "Sweden", "Norway", "Denmark", "Finland", "Poland", "Ukraine", "Russia",
        "Greece", "Turkey", "Israel", "Egypt", "Iran", "Iraq", "Syria", "Saudi Arabia",
        "India", "Pakistan", "China", "Japan", "South Korea", "North Korea", "Vietnam",
        "Thailand", "Indonesia", "Philippines", "Singapore", "Malaysia", "Australia",
        "New Zealand", "Nigeria", "Kenya", "Ethiopia", "South Africa", "Morocco", "Ghana",
        // US states
        "Alabama", "Alaska", "Arizona", "Arkansas", "California", "Colorado", "Connecticut",
        "Delaware", "Florida", "Georgia", "Hawaii", "Idaho", "Illinois", "Indiana", "Iowa",
        "Kansas", "Kentucky", "Louisiana", "Maine", "Maryland", "Massachusetts", "Michigan",
        "Minnesota", "Mississippi", "Missouri", "Montana", "Nebraska", "Nevada",
        "New Hampshire", "New Jersey", "New Mexico", "New York", "North Carolina",
        "North Dakota", "Ohio", "Oklahoma", "Oregon", "Pennsylvania", "Rhode Island",
        "South Carolina", "South Dakota", "Tennessee", "Texas", "Utah", "Vermont", "Virginia",
        "Washington", "West Virginia", "Wisconsin", "Wyoming",
        // Cities
        "New York City", "Los Angeles", "San Francisco", "San Jose", "Seattle", "Chicago",
        "Boston", "Houston", "Dallas", "Austin", "Miami", "Atlanta", "Denver", "Phoenix",
        "Philadelphia", "Detroit", "Cupertino", "Palo Alto", "Mountain View", "Toronto",
        "Vancouver", "Montreal", "London", "Paris", "Berlin", "Madrid", "Rome", "Milan",
        "Amsterdam", "Brussels", "Vienna", "Zurich", "Geneva", "Stockholm", "Oslo",
        "Copenhagen", "Dublin", "Moscow", "Kyiv", "Istanbul", "Cairo", "Dubai", "Tehran",
        "Baghdad", "Jerusalem", "Tel Aviv", "Mumbai", "Delhi", "New Delhi", "Bangalore",
        "Beijing", "Shanghai", "Hong Kong", "Tokyo", "Osaka", "Seoul", "Taipei", "Bangkok",
        "Jakarta", "Manila", "Sydney", "Melbourne", "Lagos", "Nairobi", "Johannesburg",
        "Mexico City", "Sao Paulo", "Buenos Aires", "Lima", "Bogota",
    ])
});

static LOC_GAZETTEER: LazyLock<Regex> = LazyLock::new(|| {
    gazetteer_regex(&[
        "Africa", "Antarctica", "Asia", "Europe", "North America", "South America",
        "Latin America", "Central America", "Oceania", "Middle East", "Silicon Valley",
        "Scandinavia", "Balkans", "Caribbean", "Sahara", "Siberia", "Himalayas", "Alps",
        "Andes", "Rocky Mountains", "Atlantic", "Pacific", "Atlantic Ocean", "Pacific Ocean",
        "Indian Ocean", "Arctic Ocean", "Mediterranean", "Mediterranean Sea", "Red Sea",
        "Black Sea", "Baltic Sea", "Nile", "Amazon River", "Mississippi River", "Mount Everest",
        "Great Lakes", "West Coast", "East Coast", "Midwest",
    ])
});

// ============================================================================
// Patterns
// ============================================================================

static ORG_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:[A-Z][A-Za-z&'\-]*\s+)+(?:(?:Inc|Corp|Ltd|Co)(?:\.|\b)|(?:LLC|PLC|GmbH|Corporation|Company|Group|Holdings|Technologies|Systems|Partners|Foundation|Association|Institute|University|College|Bank|Agency|Committee|Council|Party)\b)",
    )
    .expect("organisation suffix pattern should compile")
});

static ORG_OF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:University|Bank|Department|Ministry|Institute|Museum|Office|Bureau|Church)\s+of(?:\s+the)?(?:\s+[A-Z][a-z]+)+",
    )
    .expect("organisation 'of' pattern should compile")
});

static LOC_FEATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:Mount|Lake|Gulf of|Bay of|Sea of|Cape)\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?|\b[A-Z][a-z]+\s+(?:River|Mountains|Valley|Desert|Island|Islands|Ocean|Sea)\b")
        .expect("location feature pattern should compile")
});

static MONEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[$€£¥]\s?\d[\d,]*(?:\.\d+)?(?:\s+(?:thousand|million|billion|trillion)\b)?|\b\d[\d,]*(?:\.\d+)?\s+(?:dollars|euros|pounds|yen)\b",
    )
    .expect("money pattern should compile")
});

static PERCENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d+(?:\.\d+)?(?:\s?%|\s+percent\b)").expect("percent pattern should compile")
});

const MONTHS: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";

static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // March 3, 2021 / March 3 / March 2021
        Regex::new(&format!(
            r"\b(?:{m})\s+\d{{1,2}}(?:st|nd|rd|th)?(?:,?\s+\d{{4}})?\b|\b(?:{m})\s+\d{{4}}\b",
            m = MONTHS
        ))
        .expect("month date pattern should compile"),
        // 3 March 2021
        Regex::new(&format!(r"\b\d{{1,2}}\s+(?:{m})(?:\s+\d{{4}})?\b", m = MONTHS))
            .expect("day-month pattern should compile"),
        // 2021-03-03, 03/03/2021
        Regex::new(r"\b\d{4}-\d{2}-\d{2}\b|\b\d{1,2}/\d{1,2}/\d{2,4}\b")
            .expect("numeric date pattern should compile"),
    ]
});

static YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:1[5-9]\d{2}|20\d{2})s?\b").expect("year pattern should compile")
});

static TITLED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:Mr|Mrs|Ms|Dr|Prof|Sir|Dame|President|Senator|Governor|Mayor|Judge|General|Captain|CEO|Chairman|Minister)\.?\s+([A-Z][a-z]+(?:\s+[A-Z]\.)?(?:\s+[A-Z][a-z]+)*)",
    )
    .expect("title pattern should compile")
});

static CAPITALIZED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:[ \t]+(?:[A-Z]\.[ \t]+)?[A-Z][a-z]+){1,3}\b")
        .expect("capitalized name pattern should compile")
});

static LEADING_STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "The", "A", "An", "In", "On", "At", "By", "For", "From", "To", "Of", "And", "But",
        "Or", "If", "When", "While", "After", "Before", "Since", "During", "This", "That",
        "These", "Those", "Yesterday", "Today", "Tomorrow", "Last", "Next", "Dear", "Hello",
        "Hi", "Thanks", "Meanwhile", "However", "According",
    ]
    .into_iter()
    .collect()
});

// Capitalised words that rule a span out as a person name.
static NON_NAME_TOKENS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "January", "February", "March", "April", "June", "July", "August", "September",
        "October", "November", "December", "Monday", "Tuesday", "Wednesday", "Thursday",
        "Friday", "Saturday", "Sunday", "Street", "Avenue", "Road", "Boulevard", "North",
        "South", "East", "West", "Page", "Chapter", "Section", "Table", "Figure",
    ]
    .into_iter()
    .collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    fn labels_of<'a>(entities: &'a [Entity], label: &str) -> Vec<&'a str> {
        entities
            .iter()
            .filter(|e| e.label == label)
            .map(|e| e.text.as_str())
            .collect()
    }

    #[test]
    fn test_founders_sentence() {
        let entities = RuleNerBackend
            .extract("Apple was founded by Steve Jobs in California.")
            .unwrap();

        assert_eq!(
            entities,
            vec![
                Entity {
                    text: "Apple".into(),
                    label: "ORG".into(),
                    start: Some(0)
                },
                Entity {
                    text: "Steve Jobs".into(),
                    label: "PERSON".into(),
                    start: Some(21)
                },
                Entity {
                    text: "California".into(),
                    label: "GPE".into(),
                    start: Some(35)
                },
            ]
        );
    }

    #[test]
    fn test_gazetteer_prefers_longest_place() {
        let entities = RuleNerBackend
            .extract("She moved to New York City last spring.")
            .unwrap();
        assert_eq!(labels_of(&entities, "GPE"), vec!["New York City"]);
        assert!(labels_of(&entities, "PERSON").is_empty());
    }

    #[test]
    fn test_leading_stopword_trimmed() {
        let entities = RuleNerBackend
            .extract("Yesterday Ada Lovelace published her notes.")
            .unwrap();
        assert_eq!(labels_of(&entities, "PERSON"), vec!["Ada Lovelace"]);
    }

    #[test]
    fn test_titled_person() {
        let entities = RuleNerBackend
            .extract("The report was signed by Dr. Smith on behalf of the board.")
            .unwrap();
        assert_eq!(labels_of(&entities, "PERSON"), vec!["Smith"]);
    }

    #[test]
    fn test_org_suffix_and_money() {
        let entities = RuleNerBackend
            .extract("Acme Widgets Inc. raised $2.5 million, up 12% from 2019.")
            .unwrap();
        assert_eq!(labels_of(&entities, "ORG"), vec!["Acme Widgets Inc."]);
        assert_eq!(labels_of(&entities, "MONEY"), vec!["$2.5 million"]);
        assert_eq!(labels_of(&entities, "PERCENT"), vec!["12%"]);
        assert_eq!(labels_of(&entities, "DATE"), vec!["2019"]);
    }

    #[test]
    fn test_dates_and_locations() {
        let entities = RuleNerBackend
            .extract("On March 3, 2021 the expedition left Europe for Mount Everest.")
            .unwrap();
        assert_eq!(labels_of(&entities, "DATE"), vec!["March 3, 2021"]);
        assert_eq!(labels_of(&entities, "LOC"), vec!["Europe", "Mount Everest"]);
    }

    #[test]
    fn test_every_occurrence_in_order() {
        let entities = RuleNerBackend
            .extract("Google and Microsoft compete. Google also partners with Microsoft.")
            .unwrap();
        let orgs = labels_of(&entities, "ORG");
        assert_eq!(orgs, vec!["Google", "Microsoft", "Google", "Microsoft"]);
        let starts: Vec<_> = entities.iter().map(|e| e.start.unwrap()).collect();
        assert!(starts.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_empty_text() {
        assert!(RuleNerBackend.extract("").unwrap().is_empty());
        assert!(RuleNerBackend
            .extract("nothing capitalised here at all")
            .unwrap()
            .is_empty());
    }
}
