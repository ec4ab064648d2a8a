//! `lexdesk documents`: List the loaded documents.

use std::path::Path;

use lexdesk_core::document::Document;

pub async fn run(case: Option<&str>, documents: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(None)?;
    let store = super::open_store(&config, documents)?;

    let docs = match case {
        Some(case_id) => store.list_by_case(case_id).await?,
        None => store.list().await?,
    };

    println!("📚 Documents ({}, source: {})", docs.len(), store.name());
    println!();

    if docs.is_empty() {
        println!("   No documents.");
        return Ok(());
    }

    for doc in &docs {
        println!("{}", render_row(doc));
    }

    Ok(())
}

pub fn render_row(doc: &Document) -> String {
    format!(
        "   {}  {:<28} {:<14} {:<8} {} chars  [{}]",
        doc.upload_date.format("%Y-%m-%d"),
        doc.name,
        doc.category.to_string(),
        doc.case_id,
        doc.content.chars().count(),
        doc.id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexdesk_store::demo_documents;

    #[test]
    fn row_shows_date_name_and_id() {
        let docs = demo_documents();
        let row = render_row(&docs[2]);
        assert!(row.starts_with("   2023-03-10  Land_Sale_Agreement.pdf"));
        assert!(row.contains("Contract"));
        assert!(row.ends_with("[doc-3]"));
    }
}
