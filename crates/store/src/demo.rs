//! The demo document set the dashboard starts with.

use chrono::{TimeZone, Utc};
use lexdesk_core::document::{Document, DocumentCategory};

fn dated(mut doc: Document, year: i32, month: u32, day: u32) -> Document {
    if let Some(date) = Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).single() {
        doc.upload_date = date;
    }
    doc
}

/// Three documents across two cases: a supply contract, the plaint in the
/// supply dispute, and a land sale agreement.
pub fn demo_documents() -> Vec<Document> {
    vec![
        dated(
            Document::new(
                "Supply_Agreement_v2.pdf",
                "case-1",
                DocumentCategory::Contract,
                "This Supply Agreement is made on this 1st day of January 2022, between Kampala \
                 Industries Ltd. (\"Buyer\") and Global Supplies Inc. (\"Seller\"). The Seller \
                 agrees to supply 500 tons of raw material per month...",
            )
            .with_id("doc-1"),
            2023,
            1,
            15,
        ),
        dated(
            Document::new(
                "Plaint_CIV-001-2023.pdf",
                "case-1",
                DocumentCategory::Pleading,
                "IN THE HIGH COURT OF UGANDA AT KAMPALA (COMMERCIAL DIVISION)\n\n\
                 CIVIL SUIT NO. 001 OF 2023\n\n\
                 KAMPALA INDUSTRIES LTD....................PLAINTIFF\n\n\
                 VERSUS\n\n\
                 GLOBAL SUPPLIES INC....................DEFENDANT\n\n\
                 PLAINT...",
            )
            .with_id("doc-2"),
            2023,
            2,
            1,
        ),
        dated(
            Document::new(
                "Land_Sale_Agreement.pdf",
                "case-2",
                DocumentCategory::Contract,
                "LAND SALE AGREEMENT\n\nThis agreement is made between John Doe (Vendor) and \
                 Jinja Agri-Ventures (Purchaser) for the sale of land comprised in Block 110, \
                 Plot 25, Jinja District...",
            )
            .with_id("doc-3"),
            2023,
            3,
            10,
        ),
    ]
}
