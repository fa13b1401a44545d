use crate::models::{Genre, GenreGroup};

use super::FallbackRule;

/// Category names that map to a genre outright
///
/// Lookups are case-insensitive. Covers the Korean bookstore taxonomy the
/// importers pull from and the English subject headings older rows carry.
pub fn default_exact_matches() -> Vec<(&'static str, Genre)> {
    use Genre::*;
    vec![
        // Fiction and its regional shelves
        ("소설", Novel),
        ("소설/시/희곡", Novel),
        ("한국소설", Novel),
        ("영미소설", Novel),
        ("일본소설", Novel),
        ("중국소설", Novel),
        ("프랑스소설", Novel),
        ("독일소설", Novel),
        ("세계의 소설", Novel),
        ("장편소설", Novel),
        ("단편소설", Novel),
        ("고전소설", Novel),
        ("Fiction", Novel),
        ("Juvenile Fiction", Novel),
        ("Korean fiction", Novel),
        ("Literary Collections", Novel),
        ("Literary Criticism", Novel),
        ("시", Poetry),
        ("시집", Poetry),
        ("한국시", Poetry),
        ("외국시", Poetry),
        ("Poetry", Poetry),
        ("에세이", Essay),
        ("수필", Essay),
        ("한국에세이", Essay),
        ("외국에세이", Essay),
        ("Essays", Essay),
        ("Juvenile Nonfiction", Essay),
        ("만화", Comics),
        ("그래픽노블", Comics),
        ("Comics", Comics),
        ("Graphic Novels", Comics),
        ("Comics & Graphic Novels", Comics),
        ("웹툰", Webtoon),
        // Genre fiction
        ("추리", Mystery),
        ("미스터리", Mystery),
        ("추리/미스터리", Mystery),
        ("추리소설", Mystery),
        ("Mystery", Mystery),
        ("스릴러", Thriller),
        ("스릴러/공포", Thriller),
        ("Thrillers", Thriller),
        ("공포", Horror),
        ("호러", Horror),
        ("공포/호러", Horror),
        ("Horror", Horror),
        ("SF", ScienceFiction),
        ("SF소설", ScienceFiction),
        ("과학소설", ScienceFiction),
        ("Science Fiction", ScienceFiction),
        ("판타지", Fantasy),
        ("환상문학", Fantasy),
        ("판타지/환상문학", Fantasy),
        ("Fantasy", Fantasy),
        ("로맨스", Romance),
        ("로맨스소설", Romance),
        ("Romance", Romance),
        ("액션", Action),
        ("무협", Action),
        ("무협소설", Action),
        ("Action", Action),
        ("코미디", Comedy),
        ("유머", Comedy),
        ("Comedy", Comedy),
        ("Humor", Comedy),
        ("Drama", Comedy),
        // Non-fiction
        ("역사", History),
        ("한국사", History),
        ("세계사", History),
        ("동양사", History),
        ("서양사", History),
        ("History", History),
        ("England", History),
        ("과학", Science),
        ("교양 과학", Science),
        ("물리학", Science),
        ("화학", Science),
        ("생명과학", Science),
        ("천문학", Science),
        ("수학", Science),
        ("Science", Science),
        ("Mathematics", Science),
        ("Nature", Science),
        ("Computers", Science),
        ("인문", Humanities),
        ("인문학", Humanities),
        ("심리학", Humanities),
        ("언어학", Humanities),
        ("교육", Humanities),
        ("Education", Humanities),
        ("Foreign Language Study", Humanities),
        ("Study Aids", Humanities),
        ("철학", Philosophy),
        ("동양철학", Philosophy),
        ("서양철학", Philosophy),
        ("Philosophy", Philosophy),
        ("사회", Society),
        ("사회과학", Society),
        ("정치", Society),
        ("사회/정치", Society),
        ("정치/외교", Society),
        ("Social Science", Society),
        ("Politics", Society),
        ("Political Science", Society),
        ("경제", Economics),
        ("경제학", Economics),
        ("경제경영", Economics),
        ("Business & Economics", Economics),
        ("경영", Management),
        ("경영일반", Management),
        ("마케팅/세일즈", Management),
        ("Management", Management),
        ("자기계발", SelfHelp),
        ("성공", SelfHelp),
        ("처세", SelfHelp),
        ("Self-Help", SelfHelp),
        ("Psychology", SelfHelp),
        ("예술", Art),
        ("예술/대중문화", Art),
        ("미술", Art),
        ("음악", Art),
        ("디자인", Art),
        ("Art", Art),
        ("Fine Arts", Art),
        ("Performing Arts", Art),
        ("Music", Art),
        ("Design", Art),
        ("Photography", Art),
        ("여행", Travel),
        ("국내여행", Travel),
        ("해외여행", Travel),
        ("Travel", Travel),
    ]
}

/// Substring rules tried in order when no exact entry matches
///
/// Earlier rules win, so compound names come before their parts
/// (`과학소설` before `과학` and `소설`, `social` before `science`) and the
/// broad fiction rules come last.
pub fn default_fallback_rules() -> Vec<FallbackRule> {
    use Genre::*;
    [
        ("과학소설", ScienceFiction),
        ("science fiction", ScienceFiction),
        ("sci-fi", ScienceFiction),
        ("추리", Mystery),
        ("미스터리", Mystery),
        ("mystery", Mystery),
        ("detective", Mystery),
        ("스릴러", Thriller),
        ("thriller", Thriller),
        ("suspense", Thriller),
        ("공포", Horror),
        ("호러", Horror),
        ("horror", Horror),
        ("판타지", Fantasy),
        ("fantasy", Fantasy),
        ("로맨스", Romance),
        ("romance", Romance),
        ("무협", Action),
        ("액션", Action),
        ("action", Action),
        ("웹툰", Webtoon),
        ("만화", Comics),
        ("comic", Comics),
        ("graphic novel", Comics),
        ("에세이", Essay),
        ("essay", Essay),
        ("시집", Poetry),
        ("poetry", Poetry),
        ("역사", History),
        ("history", History),
        ("historical", History),
        ("철학", Philosophy),
        ("philosophy", Philosophy),
        ("자기계발", SelfHelp),
        ("self-help", SelfHelp),
        ("경영", Management),
        ("management", Management),
        ("경제", Economics),
        ("economics", Economics),
        ("business", Economics),
        ("사회", Society),
        ("정치", Society),
        ("politic", Society),
        ("social", Society),
        ("여행", Travel),
        ("travel", Travel),
        ("예술", Art),
        ("미술", Art),
        ("음악", Art),
        ("fine arts", Art),
        ("performing arts", Art),
        ("music", Art),
        ("코미디", Comedy),
        ("유머", Comedy),
        ("comedy", Comedy),
        ("humor", Comedy),
        ("과학", Science),
        ("science", Science),
        ("computer", Science),
        ("인문", Humanities),
        ("심리", Humanities),
        ("교육", Humanities),
        ("education", Humanities),
        ("소설", Novel),
        ("fiction", Novel),
        ("문학", Novel),
    ]
    .into_iter()
    .map(|(pattern, genre)| FallbackRule::new(pattern, genre))
    .collect()
}

pub fn default_groups() -> Vec<GenreGroup> {
    vec![GenreGroup::new(
        "경제/경영",
        vec![Genre::Economics, Genre::Management],
    )]
}
