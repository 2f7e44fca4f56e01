//! Job catalog: static subject/target data and deterministic expansion
//!
//! Catalog data lives in a TOML file so tests can inject small fixtures
//! instead of editing module constants. Expansion is deterministic: given
//! the same data and filters, the same ordered job list comes out.

use easel_core::{slugify, EaselError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::client::{GenRequest, RequestKind};
use crate::prompt;
use crate::style::StyleGuide;

/// One illustratable object (a flashcard subject)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDef {
    pub id: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Optional local reference image sent with the generation request
    #[serde(default)]
    pub reference: Option<String>,
}

/// A localization target language
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageDef {
    pub code: String,
    pub name: String,
}

/// A marketing copy template to localize
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDef {
    pub id: String,
    pub text: String,
}

/// A language pair featured in showcase imagery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairDef {
    pub source: String,
    pub target: String,
}

impl PairDef {
    pub fn slug(&self) -> String {
        format!("{}-{}", slugify(&self.source), slugify(&self.target))
    }
}

/// All static catalog data for a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub objects: Vec<ObjectDef>,
    #[serde(default)]
    pub languages: Vec<LanguageDef>,
    #[serde(default)]
    pub templates: Vec<TemplateDef>,
    #[serde(default)]
    pub pairs: Vec<PairDef>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// TOML file wrapper
#[derive(Debug, Deserialize)]
struct CatalogFile {
    catalog: CatalogData,
}

impl CatalogData {
    /// Load catalog data from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EaselError::CatalogError(format!("cannot read catalog {}: {}", path.display(), e))
        })?;
        let file: CatalogFile = toml::from_str(&content).map_err(|e| {
            EaselError::CatalogError(format!("failed to parse catalog {}: {}", path.display(), e))
        })?;
        Ok(file.catalog)
    }
}

/// One unit of generation work
#[derive(Debug, Clone)]
pub struct Job {
    /// Stable identifier, unique within a run's catalog
    pub id: String,
    pub category: Option<String>,
    pub language: Option<String>,
    pub request: GenRequest,
    /// Pure function of (target slug, subject slug); injective per run
    pub output_path: PathBuf,
}

/// Image generation parameters shared by a run
#[derive(Debug, Clone)]
pub struct ImageOptions {
    pub size: String,
    pub quality: String,
}

/// Catalog subset selection
#[derive(Debug, Clone, Default)]
pub struct Filters {
    /// Explicit job/subject ids, exact-case match
    pub only: Option<Vec<String>>,
    /// Category names, exact match
    pub categories: Option<Vec<String>>,
    /// Language codes, case-insensitive match
    pub languages: Option<Vec<String>>,
    /// Template ids, exact-case match
    pub templates: Option<Vec<String>>,
    /// Truncate the catalog (or set the showcase wrap-around count)
    pub max_jobs: Option<usize>,
}

/// Output path for one (target, subject) pair. Target and subject each get
/// their own path component, so distinct pairs can never collide.
pub fn output_path(out_dir: &Path, target_slug: &str, subject_slug: &str, ext: &str) -> PathBuf {
    out_dir
        .join(target_slug)
        .join(format!("{}.{}", subject_slug, ext))
}

/// One illustration job per catalog object
pub fn illustration_jobs(
    data: &CatalogData,
    style: &StyleGuide,
    image: &ImageOptions,
    out_dir: &Path,
    filters: &Filters,
) -> Result<Vec<Job>> {
    ensure_unique_ids(data.objects.iter().map(|o| o.id.as_str()))?;

    if let Some(only) = &filters.only {
        let known: HashSet<&str> = data.objects.iter().map(|o| o.id.as_str()).collect();
        ensure_known_only(only, &known, "object ids")?;
    }

    let mut jobs = Vec::new();
    for object in &data.objects {
        if let Some(only) = &filters.only {
            if !only.iter().any(|id| id == &object.id) {
                continue;
            }
        }
        if let Some(categories) = &filters.categories {
            if !categories.iter().any(|c| c == &object.category) {
                continue;
            }
        }

        let reference = match &object.reference {
            Some(rel) => {
                let path = PathBuf::from(rel);
                if !path.exists() {
                    return Err(EaselError::ConfigError(format!(
                        "reference image for '{}' not found: {}",
                        object.id, rel
                    )));
                }
                Some(path)
            }
            None => None,
        };

        jobs.push(Job {
            id: object.id.clone(),
            category: Some(object.category.clone()),
            language: None,
            request: GenRequest {
                prompt: prompt::compose_illustration(object, style),
                kind: RequestKind::Image {
                    size: image.size.clone(),
                    quality: image.quality.clone(),
                    reference,
                },
            },
            output_path: output_path(
                out_dir,
                &slugify(&object.category),
                &slugify(&object.id),
                "png",
            ),
        });
    }

    finish(jobs, filters, "objects")
}

/// Cartesian templates x languages
pub fn localization_jobs(
    data: &CatalogData,
    style: &StyleGuide,
    out_dir: &Path,
    filters: &Filters,
) -> Result<Vec<Job>> {
    ensure_unique_ids(data.templates.iter().map(|t| t.id.as_str()))?;

    if let Some(only) = &filters.only {
        // Validate against the full template x language product, before any
        // other filter narrows it
        let known: HashSet<String> = data
            .templates
            .iter()
            .flat_map(|t| {
                data.languages
                    .iter()
                    .map(move |l| format!("{}-{}", t.id, l.code.to_lowercase()))
            })
            .collect();
        let known: HashSet<&str> = known.iter().map(|s| s.as_str()).collect();
        ensure_known_only(only, &known, "localization ids")?;
    }

    let languages: Vec<&LanguageDef> = match &filters.languages {
        Some(wanted) => {
            let wanted: Vec<String> = wanted.iter().map(|l| l.to_lowercase()).collect();
            data.languages
                .iter()
                .filter(|l| wanted.iter().any(|w| *w == l.code.to_lowercase()))
                .collect()
        }
        None => data.languages.iter().collect(),
    };

    let templates: Vec<&TemplateDef> = match &filters.templates {
        Some(wanted) => data
            .templates
            .iter()
            .filter(|t| wanted.iter().any(|w| w == &t.id))
            .collect(),
        None => data.templates.iter().collect(),
    };

    let mut jobs = Vec::new();
    for template in &templates {
        for language in &languages {
            let id = format!("{}-{}", template.id, language.code.to_lowercase());
            if let Some(only) = &filters.only {
                if !only.iter().any(|o| o == &id) {
                    continue;
                }
            }

            jobs.push(Job {
                id,
                category: None,
                language: Some(language.code.to_lowercase()),
                request: GenRequest {
                    prompt: prompt::compose_localization(template, language, style),
                    kind: RequestKind::Text,
                },
                output_path: output_path(
                    out_dir,
                    &slugify(&language.code),
                    &slugify(&template.id),
                    "json",
                ),
            });
        }
    }

    finish(jobs, filters, "templates x languages")
}

/// Showcase jobs: `count` jobs cycled over categories and language pairs
/// with modular indexing. The count may exceed |categories x pairs|, in
/// which case (category, pair) combinations repeat. That wrap-around is
/// intended: callers ask for N showcase images regardless of catalog size,
/// and the per-job index keeps ids and output paths distinct.
pub fn showcase_jobs(
    data: &CatalogData,
    style: &StyleGuide,
    image: &ImageOptions,
    out_dir: &Path,
    filters: &Filters,
) -> Result<Vec<Job>> {
    let categories: Vec<&String> = match &filters.categories {
        Some(wanted) => data
            .categories
            .iter()
            .filter(|c| wanted.iter().any(|w| w == *c))
            .collect(),
        None => data.categories.iter().collect(),
    };

    if categories.is_empty() || data.pairs.is_empty() {
        return Err(EaselError::CatalogError(
            "showcase catalog needs at least one category and one language pair".to_string(),
        ));
    }

    let count = filters
        .max_jobs
        .unwrap_or(categories.len() * data.pairs.len());

    let mut jobs = Vec::with_capacity(count);
    for n in 0..count {
        let category = categories[n % categories.len()];
        let pair = &data.pairs[n % data.pairs.len()];

        let id = format!("showcase-{:02}-{}-{}", n + 1, slugify(category), pair.slug());
        jobs.push(Job {
            id: id.clone(),
            category: Some(category.to_string()),
            language: Some(pair.slug()),
            request: GenRequest {
                prompt: prompt::compose_showcase(category, pair, style),
                kind: RequestKind::Image {
                    size: image.size.clone(),
                    quality: image.quality.clone(),
                    reference: None,
                },
            },
            output_path: output_path(out_dir, &pair.slug(), &slugify(&id), "png"),
        });
    }

    // The id allow-list applies after index-based expansion, so a re-run of
    // selected ids sees the same (category, pair) assignments as the full run
    if let Some(only) = &filters.only {
        let known: HashSet<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
        ensure_known_only(only, &known, "showcase ids")?;
        jobs.retain(|j| only.iter().any(|id| id == &j.id));
    }

    Ok(jobs)
}

fn ensure_known_only(only: &[String], known: &HashSet<&str>, what: &str) -> Result<()> {
    let unknown: Vec<&str> = only
        .iter()
        .map(|s| s.as_str())
        .filter(|id| !known.contains(id))
        .collect();
    if !unknown.is_empty() {
        return Err(EaselError::CatalogError(format!(
            "--only names unknown {}: {}",
            what,
            unknown.join(", ")
        )));
    }
    Ok(())
}

/// Apply the job cap and refuse to return an empty catalog.
fn finish(mut jobs: Vec<Job>, filters: &Filters, what: &str) -> Result<Vec<Job>> {
    if jobs.is_empty() {
        let detail = if filters.only.is_some()
            || filters.categories.is_some()
            || filters.languages.is_some()
            || filters.templates.is_some()
        {
            format!("the requested filters matched no {}", what)
        } else {
            format!("the catalog contains no {}", what)
        };
        return Err(EaselError::CatalogError(detail));
    }

    if let Some(max) = filters.max_jobs {
        jobs.truncate(max);
        if jobs.is_empty() {
            return Err(EaselError::CatalogError(
                "--max-jobs=0 leaves nothing to do".to_string(),
            ));
        }
    }

    Ok(jobs)
}

fn ensure_unique_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(EaselError::CatalogError(format!(
                "duplicate catalog id: {}",
                id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet as Set;

    fn fixture() -> CatalogData {
        CatalogData {
            objects: vec![
                ObjectDef {
                    id: "red-apple".to_string(),
                    category: "Food".to_string(),
                    description: "A shiny red apple".to_string(),
                    reference: None,
                },
                ObjectDef {
                    id: "blue-ball".to_string(),
                    category: "Toys".to_string(),
                    description: "A bouncy blue ball".to_string(),
                    reference: None,
                },
            ],
            languages: vec![
                LanguageDef {
                    code: "fr".to_string(),
                    name: "French".to_string(),
                },
                LanguageDef {
                    code: "es".to_string(),
                    name: "Spanish".to_string(),
                },
            ],
            templates: vec![TemplateDef {
                id: "hero-tagline".to_string(),
                text: "Learn words through play!".to_string(),
            }],
            pairs: vec![
                PairDef {
                    source: "English".to_string(),
                    target: "French".to_string(),
                },
                PairDef {
                    source: "English".to_string(),
                    target: "Spanish".to_string(),
                },
            ],
            categories: vec![
                "Food".to_string(),
                "Toys".to_string(),
                "Animals".to_string(),
            ],
        }
    }

    fn image() -> ImageOptions {
        ImageOptions {
            size: "1024x1024".to_string(),
            quality: "high".to_string(),
        }
    }

    #[test]
    fn test_illustration_jobs_ordered_and_deterministic() {
        let data = fixture();
        let out = Path::new("out");
        let a = illustration_jobs(&data, &StyleGuide::default(), &image(), out, &Filters::default())
            .unwrap();
        let b = illustration_jobs(&data, &StyleGuide::default(), &image(), out, &Filters::default())
            .unwrap();

        let ids_a: Vec<&str> = a.iter().map(|j| j.id.as_str()).collect();
        let ids_b: Vec<&str> = b.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids_a, vec!["red-apple", "blue-ball"]);
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn test_output_paths_are_injective() {
        let data = fixture();
        let jobs = localization_jobs(
            &data,
            &StyleGuide::default(),
            Path::new("out"),
            &Filters::default(),
        )
        .unwrap();

        let paths: Set<&PathBuf> = jobs.iter().map(|j| &j.output_path).collect();
        assert_eq!(paths.len(), jobs.len());
    }

    #[test]
    fn test_only_filter_exact_case() {
        let data = fixture();
        let filters = Filters {
            only: Some(vec!["red-apple".to_string()]),
            ..Default::default()
        };
        let jobs =
            illustration_jobs(&data, &StyleGuide::default(), &image(), Path::new("out"), &filters)
                .unwrap();
        assert_eq!(jobs.len(), 1);

        let filters = Filters {
            only: Some(vec!["Red-Apple".to_string()]),
            ..Default::default()
        };
        let err =
            illustration_jobs(&data, &StyleGuide::default(), &image(), Path::new("out"), &filters)
                .unwrap_err();
        assert!(err.to_string().contains("unknown object ids"));
    }

    #[test]
    fn test_language_filter_case_insensitive() {
        let data = fixture();
        let filters = Filters {
            languages: Some(vec!["FR".to_string()]),
            ..Default::default()
        };
        let jobs =
            localization_jobs(&data, &StyleGuide::default(), Path::new("out"), &filters).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].language.as_deref(), Some("fr"));
    }

    #[test]
    fn test_empty_filtered_catalog_fails_loudly() {
        let data = fixture();
        let filters = Filters {
            languages: Some(vec!["de".to_string()]),
            ..Default::default()
        };
        assert!(localization_jobs(&data, &StyleGuide::default(), Path::new("out"), &filters)
            .is_err());
    }

    #[test]
    fn test_showcase_wraps_with_modular_indexing() {
        let data = fixture();
        let filters = Filters {
            max_jobs: Some(8),
            ..Default::default()
        };
        let jobs =
            showcase_jobs(&data, &StyleGuide::default(), &image(), Path::new("out"), &filters)
                .unwrap();

        // 3 categories x 2 pairs = 6 natural combinations; 8 jobs wrap
        assert_eq!(jobs.len(), 8);
        assert_eq!(jobs[0].category.as_deref(), jobs[6].category.as_deref());

        // Ids and paths stay distinct even across the wrap
        let ids: Set<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids.len(), 8);
        let paths: Set<&PathBuf> = jobs.iter().map(|j| &j.output_path).collect();
        assert_eq!(paths.len(), 8);
    }

    #[test]
    fn test_showcase_only_filter_selects_subset() {
        let data = fixture();
        let all =
            showcase_jobs(&data, &StyleGuide::default(), &image(), Path::new("out"), &Filters::default())
                .unwrap();
        let wanted = all[1].id.clone();

        let filters = Filters {
            only: Some(vec![wanted.clone()]),
            ..Default::default()
        };
        let jobs =
            showcase_jobs(&data, &StyleGuide::default(), &image(), Path::new("out"), &filters)
                .unwrap();

        // Same (category, pair) assignment as the unfiltered run
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, wanted);
        assert_eq!(jobs[0].category, all[1].category);
        assert_eq!(jobs[0].output_path, all[1].output_path);
    }

    #[test]
    fn test_showcase_unknown_only_id_rejected() {
        let data = fixture();
        let filters = Filters {
            only: Some(vec!["showcase-99-food-english-french".to_string()]),
            ..Default::default()
        };
        let err =
            showcase_jobs(&data, &StyleGuide::default(), &image(), Path::new("out"), &filters)
                .unwrap_err();
        assert!(err.to_string().contains("unknown showcase ids"));
    }

    #[test]
    fn test_localization_unknown_only_id_rejected() {
        let data = fixture();
        // One valid id plus one for a language the catalog does not have
        let filters = Filters {
            only: Some(vec![
                "hero-tagline-fr".to_string(),
                "hero-tagline-de".to_string(),
            ]),
            ..Default::default()
        };
        let err =
            localization_jobs(&data, &StyleGuide::default(), Path::new("out"), &filters)
                .unwrap_err();
        assert!(err.to_string().contains("unknown localization ids"));
        assert!(err.to_string().contains("hero-tagline-de"));
    }

    #[test]
    fn test_max_jobs_truncates() {
        let data = fixture();
        let filters = Filters {
            max_jobs: Some(1),
            ..Default::default()
        };
        let jobs =
            illustration_jobs(&data, &StyleGuide::default(), &image(), Path::new("out"), &filters)
                .unwrap();
        assert_eq!(jobs.len(), 1);
    }

    #[test]
    fn test_duplicate_object_ids_rejected() {
        let mut data = fixture();
        data.objects.push(data.objects[0].clone());
        assert!(illustration_jobs(
            &data,
            &StyleGuide::default(),
            &image(),
            Path::new("out"),
            &Filters::default()
        )
        .is_err());
    }

    #[test]
    fn test_missing_reference_is_config_error() {
        let mut data = fixture();
        data.objects[0].reference = Some("definitely/not/here.png".to_string());
        let err = illustration_jobs(
            &data,
            &StyleGuide::default(),
            &image(),
            Path::new("out"),
            &Filters::default(),
        )
        .unwrap_err();
        assert!(matches!(err, EaselError::ConfigError(_)));
    }
}
