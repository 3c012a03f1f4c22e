//! Terminal rendering for command results: tables, pagination footers,
//! result cards and text histograms.

use console::style;

use oeuvreguard::api::{AnalysisResult, PlagiarismRecord, UploadResult, User, Work};
use oeuvreguard::listing::{HistogramBucket, Paginator, WorkStats};
use oeuvreguard::receipts::Receipt;
use oeuvreguard::risk::{self, RiskLevel};

const HISTOGRAM_WIDTH: usize = 40;

fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

/// Plain-text table with left-aligned, width-fitted columns.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| {
                let pad = w.saturating_sub(cell.chars().count());
                format!("{cell}{}", " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(headers.to_vec()));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    out.push_str(&line(rule.iter().map(String::as_str).collect()));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

/// "Page 2 sur 3" plus which neighbours are reachable.
pub fn pagination_footer(p: &Paginator) -> String {
    let prev = if p.has_previous() {
        format!("--page {} ← Précédent", p.current_page() - 1)
    } else {
        "Précédent (désactivé)".to_string()
    };
    let next = if p.has_next() {
        format!("Suivant → --page {}", p.current_page() + 1)
    } else {
        "Suivant (désactivé)".to_string()
    };
    format!(
        "Page {} sur {}   {prev} | {next}   ({} éléments)",
        p.current_page(),
        p.page_count().max(1),
        p.total_items()
    )
}

pub fn works_table(works: &[&Work]) -> String {
    let rows: Vec<Vec<String>> = works
        .iter()
        .map(|w| {
            vec![
                w.id.clone(),
                w.type_oeuvre.clone(),
                w.titre.clone(),
                or_dash(Some(w.auteur.as_str())),
                or_dash(w.genre.as_deref()),
                or_dash(w.langue.as_deref()),
                w.fichier_nom.clone(),
                w.date_enregistrement.clone(),
            ]
        })
        .collect();
    render_table(
        &["ID", "Type", "Titre", "Auteur", "Genre", "Langue", "Fichier", "Date"],
        &rows,
    )
}

/// AI score as the listing shows it: a missing or zero score reads "-".
pub fn format_ai_score(score: Option<f64>) -> String {
    match score {
        Some(s) if s != 0.0 && !s.is_nan() => format!("{s:.2}"),
        _ => "-".to_string(),
    }
}

pub fn plagiarism_table(records: &[&PlagiarismRecord]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                r.titre.clone(),
                or_dash(r.auteur.as_deref()),
                or_dash(r.ia_detectee.as_deref()),
                format_ai_score(r.score_ia),
            ]
        })
        .collect();
    render_table(&["ID", "Titre", "Auteur", "IA détectée", "Score IA"], &rows)
}

pub fn users_table(users: &[&User]) -> String {
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| vec![u.id.to_string(), u.name.clone(), u.email.clone(), u.role.clone()])
        .collect();
    render_table(&["ID", "Nom", "Email", "Rôle"], &rows)
}

pub fn receipts_table(receipts: &[&Receipt]) -> String {
    let rows: Vec<Vec<String>> = receipts
        .iter()
        .map(|r| {
            let reference = r
                .fingerprint
                .as_deref()
                .or(r.remote_id.as_deref())
                .map(|s| s.chars().take(16).collect::<String>())
                .unwrap_or_else(|| "-".to_string());
            vec![
                r.created_at.chars().take(19).collect(),
                r.kind.to_string(),
                r.title.clone(),
                or_dash(r.author.as_deref()),
                reference,
                r.similarity
                    .map(|s| format!("{s}%"))
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    render_table(
        &["Date", "Type", "Titre", "Auteur", "Empreinte / Analyse", "Similarité"],
        &rows,
    )
}

/// Every field of one receipt, one per line.
pub fn receipt_detail(r: &Receipt) -> String {
    let similarity = r
        .similarity
        .map(|s| format!("{s}%"))
        .unwrap_or_else(|| "-".to_string());
    let fingerprint_check = match r.fingerprint_matches_local() {
        Some(true) => "identique au SHA-256 local",
        Some(false) => "différente du SHA-256 local",
        None => "-",
    };
    let fields = [
        ("ID", r.id.clone()),
        ("Type", r.kind.to_string()),
        ("Date", r.created_at.clone()),
        ("Titre", r.title.clone()),
        ("Auteur", or_dash(r.author.as_deref())),
        ("Fichier", or_dash(r.file_name.as_deref())),
        ("Type MIME", or_dash(r.mime_type.as_deref())),
        ("SHA-256 local", or_dash(r.local_sha256.as_deref())),
        ("Empreinte", or_dash(r.fingerprint.as_deref())),
        ("Contrôle", fingerprint_check.to_string()),
        ("Analyse", or_dash(r.remote_id.as_deref())),
        ("Similarité", similarity),
        ("Document", r.artifact_url.clone()),
    ];
    fields
        .iter()
        .map(|(label, value)| format!("{label:<14} {value}\n"))
        .collect()
}

pub fn work_stats(stats: &WorkStats) -> String {
    let mut out = format!("Total des œuvres: {}\n", stats.total);
    for kind in ["Musique", "Texte"] {
        out.push_str(&format!("  {kind}: {}\n", stats.count(kind)));
    }
    for (kind, count) in &stats.by_type {
        if kind != "Musique" && kind != "Texte" {
            out.push_str(&format!("  {}: {count}\n", or_dash(Some(kind.as_str()))));
        }
    }
    out
}

pub fn histogram(buckets: &[HistogramBucket]) -> String {
    let max = buckets.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    let mut out = String::from("Distribution des scores IA\n");
    for b in buckets {
        let bar = "█".repeat(b.count * HISTOGRAM_WIDTH / max);
        out.push_str(&format!("  {:<9} {bar} {}\n", b.range, b.count));
    }
    out
}

fn styled_risk(level: RiskLevel) -> String {
    let label = level.label();
    match level {
        RiskLevel::Undetermined => style(label).dim().to_string(),
        RiskLevel::Low => style(label).green().to_string(),
        RiskLevel::Moderate => style(label).yellow().to_string(),
        RiskLevel::High => style(label).red().bold().to_string(),
    }
}

pub fn upload_result(result: &UploadResult, certificate_url: &str, fingerprint_match: Option<bool>) {
    println!("{} Œuvre enregistrée", style("✔").green());
    println!("  Œuvre:                    {}", result.oeuvre);
    println!("  Empreinte numérique:      {}", result.empreinte_hash);
    println!("  Certificat:               {}", style(certificate_url).underlined().blue());
    match fingerprint_match {
        Some(true) => println!("  {}", style("Empreinte = SHA-256 du fichier envoyé").dim()),
        Some(false) => println!(
            "  {}",
            style("Empreinte calculée par le serveur (format différent du SHA-256 local)").dim()
        ),
        None => {}
    }
}

pub fn analysis_result(result: &AnalysisResult, report_url: &str) {
    let level = risk::classify(result.similarite);
    println!("{} Analyse terminée", style("✔").green());
    println!("  Analyse:     {}", result.analyse_id);
    if let Some(s) = result.similarite {
        println!("  Similarité:  {s}%");
    }
    println!("  Risque:      {}", styled_risk(level));
    println!("  Rapport:     {}", style(report_url).underlined().blue());
}

pub fn error(message: &str) {
    eprintln!("{} {message}", style("✘").red());
}
