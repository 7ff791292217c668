//! Denormalized display context for change entries.
//!
//! Entries must stay readable after the entities they reference are gone,
//! so each one carries the display names current at mutation time.

use serde_json::{Value, json};
use soli_core::entities::{
    CommunicationTemplate, Configuration, FileRecord, Lender, Loan, Project, Transaction,
};

pub(crate) fn project(project: &Project) -> Value {
    json!({ "project_name": project.name })
}

pub(crate) fn configuration(configuration: &Configuration) -> Value {
    json!({ "display_name": configuration.display_name })
}

pub(crate) fn lender(lender: &Lender) -> Value {
    json!({ "lender_name": lender.name })
}

pub(crate) fn loan(lender: &Lender, loan: &Loan) -> Value {
    json!({
        "lender_name": lender.name,
        "loan_name": loan.name,
    })
}

pub(crate) fn transaction(lender: &Lender, loan: &Loan, transaction: &Transaction) -> Value {
    json!({
        "lender_name": lender.name,
        "loan_name": loan.name,
        "kind": transaction.kind.as_str(),
        "amount_cents": transaction.amount_cents,
    })
}

pub(crate) fn file(lender: &Lender, loan: &Loan, file: &FileRecord) -> Value {
    json!({
        "lender_name": lender.name,
        "loan_name": loan.name,
        "file_name": file.file_name,
    })
}

pub(crate) fn template(template: &CommunicationTemplate) -> Value {
    json!({
        "template_name": template.name,
        "kind": template.kind.as_str(),
    })
}
