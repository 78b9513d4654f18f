//! Presentation helpers
//!
//! Pure view models shared by the terminal UI and the CLI text output. Missing
//! book fields fall back to fixed texts instead of blocking rendering.

use crate::types::{BookSummary, QueryMode, RecommendationItem, Statistics, UserBookItem};

pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150x220?text=No+Image";
pub const UNKNOWN_TITLE: &str = "Título no disponible";
pub const UNKNOWN_AUTHOR: &str = "Autor desconocido";
pub const UNKNOWN_YEAR: &str = "Año desconocido";

pub const APP_TITLE: &str = "📚 Readiego";
pub const APP_SUBTITLE: &str = "Sistema Inteligente de Recomendación de Libros con Grafos";

pub const STATS_TITLE: &str = "📊 Estadísticas del Sistema";
pub const STATS_LOADING: &str = "Cargando estadísticas...";
pub const RESULTS_LOADING: &str = "Cargando resultados...";
pub const SEARCH_TITLE: &str = "🔍 Buscar Recomendaciones";

/// Everything a book card shows, already formatted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookCard {
    pub title: String,
    pub author: String,
    pub year: String,
    pub image_url: String,
    /// `📊 1.23` for relevance, `⭐ 8` for a user rating
    pub badge: Option<String>,
    pub isbn_line: Option<String>,
}

/// A field counts as missing when absent or blank
fn present(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

impl BookCard {
    fn from_summary(book: &BookSummary, badge: Option<String>) -> Self {
        Self {
            title: present(&book.title).unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            author: present(&book.author).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            year: match book.year {
                Some(year) if year != 0 => year.to_string(),
                _ => UNKNOWN_YEAR.to_string(),
            },
            image_url: present(&book.image_url).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            badge,
            isbn_line: (!book.isbn.is_empty()).then(|| format!("ISBN: {}", book.isbn)),
        }
    }
}

impl From<&BookSummary> for BookCard {
    fn from(book: &BookSummary) -> Self {
        Self::from_summary(book, None)
    }
}

impl From<&RecommendationItem> for BookCard {
    fn from(item: &RecommendationItem) -> Self {
        let value = item.relevance.value();
        // A zero relevance carries no information and is not shown
        let badge = (value != 0.0).then(|| format!("📊 {value:.2}"));
        Self::from_summary(&item.book_info, badge)
    }
}

impl From<&UserBookItem> for BookCard {
    fn from(item: &UserBookItem) -> Self {
        let badge = (item.user_rating != 0.0).then(|| format!("⭐ {}", item.user_rating));
        Self::from_summary(&item.book_info, badge)
    }
}

/// One labelled figure of the statistics card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatFigure {
    pub value: String,
    pub label: &'static str,
}

/// The four figures of the statistics card, in display order
pub fn stat_figures(stats: &Statistics) -> [StatFigure; 4] {
    [
        StatFigure {
            value: group_thousands(stats.user_count),
            label: "Usuarios",
        },
        StatFigure {
            value: group_thousands(stats.book_count),
            label: "Libros",
        },
        StatFigure {
            value: group_thousands(stats.rating_count),
            label: "Calificaciones",
        },
        StatFigure {
            value: density_percent(stats.density),
            label: "Densidad del Grafo",
        },
    ]
}

/// `0.000123` → `0.0123%`
pub fn density_percent(density: f64) -> String {
    if density == 0.0 {
        return "0%".to_string();
    }
    format!("{:.4}%", density * 100.0)
}

/// `1234567` → `1,234,567`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Badge next to the results heading
pub fn results_count(n: usize) -> String {
    format!("{n} resultados")
}

/// Texts of one search tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTab {
    pub title: &'static str,
    pub description: &'static str,
    pub placeholder: &'static str,
    pub button: &'static str,
    pub busy_button: &'static str,
}

pub fn search_tab(mode: QueryMode) -> SearchTab {
    match mode {
        QueryMode::UserRecommendations => SearchTab {
            title: "Por Usuario",
            description: "Ingresa el ID de un usuario para obtener recomendaciones personalizadas",
            placeholder: "Ej: 276725, 11676, 198711...",
            button: "Recomendar",
            busy_button: "Buscando...",
        },
        QueryMode::SimilarBooks => SearchTab {
            title: "Libros Similares",
            description: "Ingresa el ISBN de un libro para encontrar libros similares",
            placeholder: "Ej: 0439136350, 0060256672...",
            button: "Buscar Similares",
            busy_button: "Buscando...",
        },
        QueryMode::UserBooks => SearchTab {
            title: "Mis Libros",
            description: "Ve los libros que un usuario ha calificado",
            placeholder: "Ej: 276725, 11676...",
            button: "Ver Libros",
            busy_button: "Cargando...",
        },
    }
}
