use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Canonical genre a book can be classified into
///
/// The set is closed: every category string the service sees either resolves to one
/// of these values or to nothing. Serialized by its Korean display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Genre {
    // Top level
    #[serde(rename = "소설")]
    Novel,
    #[serde(rename = "시")]
    Poetry,
    #[serde(rename = "에세이")]
    Essay,
    #[serde(rename = "만화")]
    Comics,
    #[serde(rename = "웹툰")]
    Webtoon,

    // Sub level
    #[serde(rename = "추리")]
    Mystery,
    #[serde(rename = "스릴러")]
    Thriller,
    #[serde(rename = "공포")]
    Horror,
    #[serde(rename = "SF")]
    ScienceFiction,
    #[serde(rename = "판타지")]
    Fantasy,
    #[serde(rename = "로맨스")]
    Romance,
    #[serde(rename = "액션")]
    Action,
    #[serde(rename = "역사")]
    History,
    #[serde(rename = "과학")]
    Science,
    #[serde(rename = "인문")]
    Humanities,
    #[serde(rename = "철학")]
    Philosophy,
    #[serde(rename = "사회")]
    Society,
    #[serde(rename = "경제")]
    Economics,
    #[serde(rename = "경영")]
    Management,
    #[serde(rename = "자기계발")]
    SelfHelp,
    #[serde(rename = "예술")]
    Art,
    #[serde(rename = "여행")]
    Travel,
    #[serde(rename = "코미디")]
    Comedy,
}

impl Genre {
    /// Top-level genres in display order
    pub const TOP_LEVEL: [Genre; 5] = [
        Genre::Novel,
        Genre::Poetry,
        Genre::Essay,
        Genre::Comics,
        Genre::Webtoon,
    ];

    /// Sub-level genres in display order
    pub const SUB_LEVEL: [Genre; 18] = [
        Genre::Mystery,
        Genre::Thriller,
        Genre::Horror,
        Genre::ScienceFiction,
        Genre::Fantasy,
        Genre::Romance,
        Genre::Action,
        Genre::History,
        Genre::Science,
        Genre::Humanities,
        Genre::Philosophy,
        Genre::Society,
        Genre::Economics,
        Genre::Management,
        Genre::SelfHelp,
        Genre::Art,
        Genre::Travel,
        Genre::Comedy,
    ];

    /// Korean display label
    pub fn label(&self) -> &'static str {
        match self {
            Genre::Novel => "소설",
            Genre::Poetry => "시",
            Genre::Essay => "에세이",
            Genre::Comics => "만화",
            Genre::Webtoon => "웹툰",
            Genre::Mystery => "추리",
            Genre::Thriller => "스릴러",
            Genre::Horror => "공포",
            Genre::ScienceFiction => "SF",
            Genre::Fantasy => "판타지",
            Genre::Romance => "로맨스",
            Genre::Action => "액션",
            Genre::History => "역사",
            Genre::Science => "과학",
            Genre::Humanities => "인문",
            Genre::Philosophy => "철학",
            Genre::Society => "사회",
            Genre::Economics => "경제",
            Genre::Management => "경영",
            Genre::SelfHelp => "자기계발",
            Genre::Art => "예술",
            Genre::Travel => "여행",
            Genre::Comedy => "코미디",
        }
    }

    pub fn is_top_level(&self) -> bool {
        Self::TOP_LEVEL.contains(self)
    }

    /// Looks a genre up by its display label
    pub fn from_label(label: &str) -> Option<Genre> {
        Self::TOP_LEVEL
            .iter()
            .chain(Self::SUB_LEVEL.iter())
            .find(|g| g.label() == label)
            .copied()
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Named union of sub-level genres shown as a single statistics row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreGroup {
    pub name: String,
    pub members: Vec<Genre>,
}

impl GenreGroup {
    pub fn new(name: impl Into<String>, members: Vec<Genre>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }
}
