//! Merge data assembly for rendering a loan document or email.

use serde_json::{Value, json};

use soli_core::entities::{Configuration, Lender, Loan, Note, Transaction};

/// Renders integer cents as a plain decimal string, e.g. `150000` to
/// `"1500.00"`.
#[must_use]
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Builds the merge data object for one loan.
///
/// Money fields arrive pre-formatted as decimal strings and dates as ISO
/// `YYYY-MM-DD`, so templates render them without further logic. Optional
/// fields that are unset stay `null`, which the engine leaves unresolved.
/// `page.*` tags are not part of this context; the PDF layer substitutes
/// them after rendering.
#[must_use]
pub fn loan_context(
    config: &Configuration,
    lender: &Lender,
    loan: &Loan,
    transactions: &[Transaction],
    notes: &[Note],
) -> Value {
    let interest_method = loan.interest_method.unwrap_or(config.interest_method);
    json!({
        "lender": {
            "name": lender.name,
            "email": lender.email,
            "phone": lender.phone,
            "iban": lender.iban,
            "street": lender.street,
            "postal_code": lender.postal_code,
            "city": lender.city,
            "country": lender.country,
        },
        "loan": {
            "name": loan.name,
            "principal": format_cents(loan.principal_cents),
            "interest_rate": loan.interest_rate,
            "interest_method": interest_method.as_str(),
            "start_date": loan.start_date.to_string(),
            "end_date": loan.end_date.map(|d| d.to_string()),
            "status": loan.status.as_str(),
        },
        "transactions": transactions.iter().map(|t| json!({
            "kind": t.kind.as_str(),
            "amount": format_cents(t.amount_cents),
            "booked_at": t.booked_at.to_string(),
            "description": t.description,
        })).collect::<Vec<_>>(),
        "notes": notes.iter().map(|n| json!({
            "content": n.content,
            "created_at": n.created_at.date_naive().to_string(),
        })).collect::<Vec<_>>(),
        "config": {
            "display_name": config.display_name,
            "primary_color": config.primary_color,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::merge_tag_catalog;
    use crate::engine::process_template;
    use chrono::{DateTime, NaiveDate, Utc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use soli_core::enums::{InterestMethod, LoanStatus, TransactionKind};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn datetime(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn sample_config() -> Configuration {
        Configuration {
            id: "cfg-11111111".to_string(),
            project_id: "prj-11111111".to_string(),
            display_name: "Sonnenhof eG".to_string(),
            primary_color: "#2f6f4f".to_string(),
            interest_method: InterestMethod::Simple,
            required_loan_fields: vec!["end_date".to_string()],
            created_at: datetime("2024-01-01T08:00:00Z"),
            updated_at: datetime("2024-01-01T08:00:00Z"),
        }
    }

    fn sample_lender() -> Lender {
        Lender {
            id: "ldr-11111111".to_string(),
            project_id: "prj-11111111".to_string(),
            name: "Erika Beispiel".to_string(),
            email: "erika@example.org".to_string(),
            phone: Some("+49 30 123456".to_string()),
            iban: Some("DE89370400440532013000".to_string()),
            street: Some("Hauptstr. 1".to_string()),
            postal_code: Some("10115".to_string()),
            city: Some("Berlin".to_string()),
            country: Some("DE".to_string()),
            created_at: datetime("2024-01-02T08:00:00Z"),
            updated_at: datetime("2024-01-02T08:00:00Z"),
        }
    }

    fn sample_loan() -> Loan {
        Loan {
            id: "lon-11111111".to_string(),
            lender_id: "ldr-11111111".to_string(),
            name: "Darlehen 2024".to_string(),
            principal_cents: 1_500_000,
            interest_rate: 2.5,
            interest_method: None,
            start_date: date("2024-02-01"),
            end_date: Some(date("2029-02-01")),
            status: LoanStatus::Active,
            created_at: datetime("2024-01-03T08:00:00Z"),
            updated_at: datetime("2024-01-03T08:00:00Z"),
        }
    }

    fn sample_transactions() -> Vec<Transaction> {
        vec![
            Transaction {
                id: "txn-11111111".to_string(),
                loan_id: "lon-11111111".to_string(),
                kind: TransactionKind::Disbursement,
                amount_cents: 1_500_000,
                booked_at: date("2024-02-01"),
                description: Some("Auszahlung".to_string()),
                created_at: datetime("2024-02-01T08:00:00Z"),
                updated_at: datetime("2024-02-01T08:00:00Z"),
            },
            Transaction {
                id: "txn-22222222".to_string(),
                loan_id: "lon-11111111".to_string(),
                kind: TransactionKind::Repayment,
                amount_cents: 50_000,
                booked_at: date("2024-08-01"),
                description: Some("Tilgung".to_string()),
                created_at: datetime("2024-08-01T08:00:00Z"),
                updated_at: datetime("2024-08-01T08:00:00Z"),
            },
        ]
    }

    fn sample_notes() -> Vec<Note> {
        vec![Note {
            id: "not-11111111".to_string(),
            loan_id: "lon-11111111".to_string(),
            author_id: Some("usr-11111111".to_string()),
            content: "Vertrag unterschrieben".to_string(),
            created_at: datetime("2024-02-02T09:30:00Z"),
            updated_at: datetime("2024-02-02T09:30:00Z"),
        }]
    }

    #[rstest]
    #[case(0, "0.00")]
    #[case(5, "0.05")]
    #[case(99, "0.99")]
    #[case(100, "1.00")]
    #[case(150_000, "1500.00")]
    #[case(-50, "-0.50")]
    #[case(-123_456, "-1234.56")]
    fn formats_cents(#[case] cents: i64, #[case] expected: &str) {
        assert_eq!(format_cents(cents), expected);
    }

    #[test]
    fn renders_a_letter_template() {
        let context = loan_context(
            &sample_config(),
            &sample_lender(),
            &sample_loan(),
            &sample_transactions(),
            &sample_notes(),
        );
        let body = "Dear {{lender.name}},\n\
                    your loan {{loan.name}} over {{loan.principal}} EUR \
                    ({{loan.interest_rate}}% {{loan.interest_method}}) runs \
                    from {{loan.start_date}}.\n\
                    {{#transactions}}- {{booked_at}} {{kind}} {{amount}}\n{{/transactions}}\
                    Regards, {{config.display_name}}";
        let expected = "Dear Erika Beispiel,\n\
                        your loan Darlehen 2024 over 15000.00 EUR \
                        (2.5% simple) runs from 2024-02-01.\n\
                        - 2024-02-01 disbursement 15000.00\n\
                        - 2024-08-01 repayment 500.00\n\
                        Regards, Sonnenhof eG";
        assert_eq!(process_template(body, &context), expected);
    }

    #[test]
    fn loan_interest_method_overrides_configuration() {
        let mut loan = sample_loan();
        loan.interest_method = Some(InterestMethod::Compound);
        let context = loan_context(
            &sample_config(),
            &sample_lender(),
            &loan,
            &[],
            &[],
        );
        assert_eq!(context["loan"]["interest_method"], "compound");
    }

    #[test]
    fn unset_optional_fields_stay_unresolved() {
        let mut lender = sample_lender();
        lender.phone = None;
        let context = loan_context(&sample_config(), &lender, &sample_loan(), &[], &[]);
        assert_eq!(
            process_template("Tel: {{lender.phone}}", &context),
            "Tel: {{lender.phone}}"
        );
    }

    #[test]
    fn every_catalog_tag_resolves_against_a_full_context() {
        let context = loan_context(
            &sample_config(),
            &sample_lender(),
            &sample_loan(),
            &sample_transactions(),
            &sample_notes(),
        );
        for group in merge_tag_catalog() {
            if group.group == "page" {
                continue;
            }
            for tag in &group.tags {
                let template = match &group.loop_key {
                    Some(key) => format!("{{{{#{key}}}}}{}{{{{/{key}}}}}", tag.tag),
                    None => tag.tag.clone(),
                };
                let rendered = process_template(&template, &context);
                assert!(
                    !rendered.contains("{{"),
                    "tag {} did not resolve: {rendered:?}",
                    tag.tag
                );
            }
        }
    }

    #[test]
    fn page_tags_survive_rendering_for_the_pdf_layer() {
        let context = loan_context(
            &sample_config(),
            &sample_lender(),
            &sample_loan(),
            &[],
            &[],
        );
        assert_eq!(
            process_template("Page {{page.number}}/{{page.total}}", &context),
            "Page {{page.number}}/{{page.total}}"
        );
    }
}
