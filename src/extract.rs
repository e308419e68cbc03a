//! Record extraction and affiliation classification.
//!
//! Turns one `PubmedArticle` tree into a flat [`ReportRow`]. Authors whose first
//! affiliation mentions an industry keyword are flagged as non-academic, and a
//! contact email is lifted from any affiliation that carries one.

use crate::entrez::RawRecord;
use crate::error::{PubmedError, Result};
use crate::report::{ReportRow, NOT_AVAILABLE};

/// Substrings that mark an affiliation as industry rather than academia
pub const INDUSTRY_KEYWORDS: &[&str] = &["pharma", "biotech", "inc", "ltd", "corp"];

/// An author classified as non-academic, with the affiliation that matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlaggedAuthor {
    pub name: String,
    pub affiliation: String,
}

/// Extraction result before the author lists are joined into strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArticle {
    pub pubmed_id: String,
    pub title: String,
    pub publication_year: String,
    pub flagged_authors: Vec<FlaggedAuthor>,
    pub corresponding_email: String,
}

impl ExtractedArticle {
    /// Flatten into a report row, comma-joining names and affiliations
    pub fn into_row(self) -> ReportRow {
        let non_academic_authors = self
            .flagged_authors
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let company_affiliations = self
            .flagged_authors
            .iter()
            .map(|a| a.affiliation.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        ReportRow {
            pubmed_id: self.pubmed_id,
            title: self.title,
            publication_year: self.publication_year,
            non_academic_authors,
            company_affiliations,
            corresponding_email: self.corresponding_email,
        }
    }
}

/// True if the affiliation contains any industry keyword, case-insensitively
pub fn is_non_academic(affiliation: &str) -> bool {
    let lower = affiliation.to_lowercase();
    INDUSTRY_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Last whitespace-delimited token of an affiliation containing `@`
pub fn email_from_affiliation(affiliation: &str) -> Option<&str> {
    if affiliation.contains('@') {
        affiliation.split_whitespace().last()
    } else {
        None
    }
}

/// Extract the structured article from one raw record.
///
/// Missing fields fall back to `N/A` independently of each other. Only a record
/// that is not a `PubmedArticle` at all is rejected.
pub fn extract_article(record: &RawRecord) -> Result<ExtractedArticle> {
    if record.name != "PubmedArticle" {
        return Err(PubmedError::Validation(format!(
            "unsupported record type <{}>",
            record.name
        )));
    }

    let pubmed_id = record
        .text_at(&["MedlineCitation", "PMID"])
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let article = record.path(&["MedlineCitation", "Article"]);

    let title = article
        .and_then(|a| a.text_at(&["ArticleTitle"]))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let publication_year = article
        .and_then(|a| a.path(&["Journal", "JournalIssue", "PubDate"]))
        .and_then(publication_year)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let mut flagged_authors = Vec::new();
    let mut corresponding_email = NOT_AVAILABLE.to_string();

    let authors = article
        .and_then(|a| a.child("AuthorList"))
        .into_iter()
        .flat_map(|list| list.children_named("Author"));

    for author in authors {
        // only the first AffiliationInfo counts
        let affiliation = author
            .text_at(&["AffiliationInfo", "Affiliation"])
            .unwrap_or_default();

        if is_non_academic(&affiliation) {
            flagged_authors.push(FlaggedAuthor {
                name: display_name(author),
                affiliation: affiliation.clone(),
            });
        }

        if let Some(email) = email_from_affiliation(&affiliation) {
            corresponding_email = email.to_string();
        }
    }

    Ok(ExtractedArticle {
        pubmed_id,
        title,
        publication_year,
        flagged_authors,
        corresponding_email,
    })
}

/// Extract one report row from a raw record
pub fn extract_row(record: &RawRecord) -> Result<ReportRow> {
    extract_article(record).map(ExtractedArticle::into_row)
}

/// `Year`, or the first four-digit run of a free-form `MedlineDate`
fn publication_year(pub_date: &RawRecord) -> Option<String> {
    pub_date.text_at(&["Year"]).or_else(|| {
        pub_date.text_at(&["MedlineDate"]).and_then(|date| {
            date.split(|c: char| !c.is_ascii_digit())
                .find(|run| run.len() == 4)
                .map(str::to_string)
        })
    })
}

/// "ForeName LastName", skipping whichever part is missing
fn display_name(author: &RawRecord) -> String {
    [author.text_at(&["ForeName"]), author.text_at(&["LastName"])]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml;

    fn author_xml(fore: &str, last: &str, affiliations: &[&str]) -> String {
        let infos: String = affiliations
            .iter()
            .map(|a| format!("<AffiliationInfo><Affiliation>{}</Affiliation></AffiliationInfo>", a))
            .collect();
        format!(
            "<Author ValidYN=\"Y\"><LastName>{}</LastName><ForeName>{}</ForeName>{}</Author>",
            last, fore, infos
        )
    }

    fn article_xml(authors: &[String]) -> String {
        format!(
            r#"<PubmedArticle>
  <MedlineCitation Status="MEDLINE" Owner="NLM">
    <PMID Version="1">38000000</PMID>
    <Article PubModel="Print">
      <Journal>
        <JournalIssue CitedMedium="Internet">
          <PubDate><Year>2023</Year><Month>Jun</Month></PubDate>
        </JournalIssue>
      </Journal>
      <ArticleTitle>Targeting <i>KRAS</i> in pancreatic cancer.</ArticleTitle>
      <AuthorList CompleteYN="Y">{}</AuthorList>
    </Article>
  </MedlineCitation>
</PubmedArticle>"#,
            authors.concat()
        )
    }

    fn extract(xml_text: &str) -> Result<ExtractedArticle> {
        extract_article(&xml::parse(xml_text)?)
    }

    #[test]
    fn test_keyword_classification() {
        assert!(is_non_academic("Pfizer Pharmaceuticals, New York"));
        assert!(is_non_academic("GENENTECH BIOTECH"));
        assert!(is_non_academic("Acme Inc."));
        assert!(is_non_academic("Foo Ltd, London"));
        assert!(is_non_academic("Big Corp"));
        assert!(!is_non_academic("Department of Biology, University of Oxford"));
        assert!(!is_non_academic(""));
    }

    #[test]
    fn test_keyword_is_substring_match() {
        // "inc" inside an ordinary word still matches
        assert!(is_non_academic("Princeton University"));
    }

    #[test]
    fn test_email_from_affiliation() {
        assert_eq!(
            email_from_affiliation("Acme Biotech Inc, contact: jdoe@acme.com"),
            Some("jdoe@acme.com")
        );
        assert_eq!(
            email_from_affiliation("Dept. of X. Electronic address: a@b.org."),
            Some("a@b.org.")
        );
        assert_eq!(email_from_affiliation("University of Nowhere"), None);
    }

    #[test]
    fn test_acme_scenario() -> Result<()> {
        let affiliation = "Acme Biotech Inc, contact: jdoe@acme.com";
        let article = extract(&article_xml(&[author_xml("Jane", "Doe", &[affiliation])]))?;

        assert_eq!(article.pubmed_id, "38000000");
        assert_eq!(article.title, "Targeting KRAS in pancreatic cancer.");
        assert_eq!(article.publication_year, "2023");
        assert_eq!(
            article.flagged_authors,
            vec![FlaggedAuthor {
                name: "Jane Doe".to_string(),
                affiliation: affiliation.to_string(),
            }]
        );
        assert_eq!(article.corresponding_email, "jdoe@acme.com");

        let row = article.into_row();
        assert_eq!(row.non_academic_authors, "Jane Doe");
        assert_eq!(row.company_affiliations, affiliation);
        Ok(())
    }

    #[test]
    fn test_no_authors() -> Result<()> {
        let row = extract_row(&xml::parse(&article_xml(&[]))?)?;
        assert_eq!(row.non_academic_authors, "");
        assert_eq!(row.company_affiliations, "");
        assert_eq!(row.corresponding_email, NOT_AVAILABLE);
        Ok(())
    }

    #[test]
    fn test_mixed_authors_lockstep() -> Result<()> {
        let article = extract(&article_xml(&[
            author_xml("A", "One", &["Novartis Pharma AG, Basel"]),
            author_xml("B", "Two", &["Harvard Medical School, Boston"]),
            author_xml("C", "Three", &["Biogen Corp, Cambridge"]),
            author_xml("D", "Four", &[]),
        ]))?;

        let names: Vec<_> = article.flagged_authors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["A One", "C Three"]);

        let row = article.into_row();
        assert_eq!(row.non_academic_authors, "A One, C Three");
        assert_eq!(
            row.company_affiliations,
            "Novartis Pharma AG, Basel, Biogen Corp, Cambridge"
        );
        assert_eq!(row.corresponding_email, NOT_AVAILABLE);
        Ok(())
    }

    #[test]
    fn test_last_email_wins() -> Result<()> {
        let article = extract(&article_xml(&[
            author_xml("A", "One", &["Uni A, first@a.edu"]),
            author_xml("B", "Two", &["Uni B"]),
            author_xml("C", "Three", &["Acme Ltd. last@acme.co.uk"]),
        ]))?;
        assert_eq!(article.corresponding_email, "last@acme.co.uk");
        Ok(())
    }

    #[test]
    fn test_only_first_affiliation_used() -> Result<()> {
        let article = extract(&article_xml(&[author_xml(
            "A",
            "One",
            &["University of Tokyo", "Takeda Pharmaceutical, x@takeda.com"],
        )]))?;
        assert!(article.flagged_authors.is_empty());
        assert_eq!(article.corresponding_email, NOT_AVAILABLE);
        Ok(())
    }

    #[test]
    fn test_missing_fields_fall_back_independently() -> Result<()> {
        let article = extract(
            r#"<PubmedArticle><MedlineCitation><Article>
                 <ArticleTitle>Only a title</ArticleTitle>
               </Article></MedlineCitation></PubmedArticle>"#,
        )?;
        assert_eq!(article.pubmed_id, NOT_AVAILABLE);
        assert_eq!(article.title, "Only a title");
        assert_eq!(article.publication_year, NOT_AVAILABLE);

        let bare = extract("<PubmedArticle/>")?;
        assert_eq!(bare.pubmed_id, NOT_AVAILABLE);
        assert_eq!(bare.title, NOT_AVAILABLE);
        Ok(())
    }

    #[test]
    fn test_medline_date_year() -> Result<()> {
        let article = extract(
            r#"<PubmedArticle><MedlineCitation><PMID>1</PMID><Article><Journal><JournalIssue>
                 <PubDate><MedlineDate>1998 Dec-1999 Jan</MedlineDate></PubDate>
               </JournalIssue></Journal></Article></MedlineCitation></PubmedArticle>"#,
        )?;
        assert_eq!(article.publication_year, "1998");
        Ok(())
    }

    #[test]
    fn test_partial_author_name() -> Result<()> {
        let article = extract(
            r#"<PubmedArticle><MedlineCitation><Article><AuthorList>
                 <Author><LastName>Solo</LastName>
                   <AffiliationInfo><Affiliation>Solo Biotech</Affiliation></AffiliationInfo>
                 </Author>
               </AuthorList></Article></MedlineCitation></PubmedArticle>"#,
        )?;
        assert_eq!(article.flagged_authors[0].name, "Solo");
        Ok(())
    }

    #[test]
    fn test_book_article_rejected() -> Result<()> {
        let record = xml::parse("<PubmedBookArticle><BookDocument/></PubmedBookArticle>")?;
        assert!(matches!(
            extract_row(&record),
            Err(PubmedError::Validation(_))
        ));
        Ok(())
    }
}
