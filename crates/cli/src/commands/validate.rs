//! `lexdesk validate`: Check document content for upload problems.

use std::path::Path;

use lexdesk_agent::validate_document_content;

pub async fn run(documents: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(None)?;
    let store = super::open_store(&config, documents)?;
    let docs = store.list().await?;

    println!("🔍 Validating {} documents...", docs.len());

    let mut flagged = 0;
    for doc in &docs {
        let report = validate_document_content(&doc.content);
        if report.is_valid {
            println!("   ✅ {}", doc.name);
            continue;
        }

        flagged += 1;
        println!("   ⚠️  {}", doc.name);
        for (issue, suggestion) in report.issues.iter().zip(&report.suggestions) {
            println!("      - {issue}");
            println!("        → {suggestion}");
        }
    }

    println!();
    if flagged == 0 {
        println!("   ✅ All documents passed");
    } else {
        println!("   {flagged} of {} documents need attention", docs.len());
    }

    Ok(())
}
