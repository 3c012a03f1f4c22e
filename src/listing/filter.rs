use crate::api::{PlagiarismRecord, User, Work};

/// Case-insensitive substring match. An empty needle matches everything.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Works whose title or author contains `search`, restricted to `type_filter`
/// (exact match on `type_oeuvre`) when it is non-empty.
pub fn filter_works<'a>(works: &'a [Work], search: &str, type_filter: &str) -> Vec<&'a Work> {
    works
        .iter()
        .filter(|w| contains_ci(&w.titre, search) || contains_ci(&w.auteur, search))
        .filter(|w| type_filter.is_empty() || w.type_oeuvre == type_filter)
        .collect()
}

/// Plagiarism records whose title or author contains `search`, restricted to
/// `author_filter` (exact match) when it is non-empty.
pub fn filter_plagiarism_records<'a>(
    records: &'a [PlagiarismRecord],
    search: &str,
    author_filter: &str,
) -> Vec<&'a PlagiarismRecord> {
    records
        .iter()
        .filter(|r| {
            contains_ci(&r.titre, search) || contains_ci(r.auteur.as_deref().unwrap_or(""), search)
        })
        .filter(|r| author_filter.is_empty() || r.auteur.as_deref() == Some(author_filter))
        .collect()
}

/// Users whose name or email contains `search`.
pub fn filter_users<'a>(users: &'a [User], search: &str) -> Vec<&'a User> {
    users
        .iter()
        .filter(|u| contains_ci(&u.name, search) || contains_ci(&u.email, search))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work(id: &str, titre: &str, auteur: &str, kind: &str) -> Work {
        Work {
            id: id.into(),
            titre: titre.into(),
            auteur: auteur.into(),
            type_oeuvre: kind.into(),
            genre: None,
            langue: Some("fr".into()),
            fichier_nom: format!("{id}.bin"),
            date_enregistrement: "2024-11-17".into(),
            ia_detectee: None,
            score_ia: None,
            similarite: None,
        }
    }

    fn works() -> Vec<Work> {
        vec![
            work("MUS-2024-0001", "Yennenga", "Awa Sawadogo", "Musique"),
            work("TXT-2024-0002", "Le baobab", "Moussa Kaboré", "Texte"),
            work("TXT-2024-0003", "Nuits de Ouaga", "AWA Zongo", "Texte"),
            work("MUS-2024-0004", "Sahel", "Ibrahim Traoré", "Musique"),
        ]
    }

    #[test]
    fn author_search_is_case_insensitive() {
        let works = works();
        let hits = filter_works(&works, "awa", "");
        let ids: Vec<_> = hits.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, ["MUS-2024-0001", "TXT-2024-0003"]);
    }

    #[test]
    fn search_and_type_filter_combine() {
        let works = works();
        let hits = filter_works(&works, "awa", "Texte");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "TXT-2024-0003");

        let only_type = filter_works(&works, "", "Musique");
        assert_eq!(only_type.len(), 2);
    }

    #[test]
    fn title_matches_too() {
        let works = works();
        let hits = filter_works(&works, "BAOBAB", "");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].auteur, "Moussa Kaboré");
    }

    #[test]
    fn type_filter_is_exact() {
        let works = works();
        assert!(filter_works(&works, "", "musique").is_empty());
    }

    #[test]
    fn plagiarism_records_with_missing_author() {
        let records = vec![
            PlagiarismRecord {
                id: "P-1".into(),
                titre: "Mémoire de fin d'étude".into(),
                auteur: None,
                ia_detectee: Some("Oui".into()),
                score_ia: Some(0.82),
            },
            PlagiarismRecord {
                id: "P-2".into(),
                titre: "Poème".into(),
                auteur: Some("Awa".into()),
                ia_detectee: Some("Non".into()),
                score_ia: Some(0.1),
            },
        ];
        assert_eq!(filter_plagiarism_records(&records, "", "").len(), 2);
        assert_eq!(filter_plagiarism_records(&records, "awa", "").len(), 1);
        let by_author = filter_plagiarism_records(&records, "", "Awa");
        assert_eq!(by_author.len(), 1);
        assert_eq!(by_author[0].id, "P-2");
        assert!(filter_plagiarism_records(&records, "mémoire", "Awa").is_empty());
    }

    #[test]
    fn users_by_name_or_email() {
        let users = vec![
            User {
                id: 1,
                name: "Awa Sawadogo".into(),
                email: "awa@oeuvreguard.bf".into(),
                role: "admin".into(),
            },
            User {
                id: 2,
                name: "Paul".into(),
                email: "paul@BURKINA.bf".into(),
                role: "agent".into(),
            },
        ];
        assert_eq!(filter_users(&users, "burkina").len(), 1);
        assert_eq!(filter_users(&users, "SAWADOGO")[0].id, 1);
        assert_eq!(filter_users(&users, "").len(), 2);
    }
}
