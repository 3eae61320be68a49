/// Offline filter engine tests over realistic spreadsheet rows
use lead_finder_api::offline::{filter_rows, OfflineFilterParams};
use serde_json::{json, Map, Value};

fn row(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

fn params(job_title: &str, location: &str, industry: &str, employees: &str, limit: usize) -> OfflineFilterParams {
    serde_json::from_value(json!({
        "jobTitle": job_title,
        "location": location,
        "industry": industry,
        "employees": employees,
        "limit": limit,
    }))
    .unwrap()
}

fn portuguese_sheet() -> Vec<Map<String, Value>> {
    vec![
        row(&[
            ("Nome", json!("Ana")),
            ("Sobrenome", json!("Souza")),
            ("Cargo", json!("Diretora de Tecnologia")),
            ("Empresa", json!("Acme Brasil")),
            ("Cidade", json!("São Paulo")),
            ("Setor", json!("Tecnologia")),
            ("Funcionários", json!("120 funcionários")),
            ("E-mail", json!("ana@acme.com.br")),
            ("LinkedIn", json!("https://linkedin.com/in/anasouza")),
        ]),
        row(&[
            ("Nome", json!("Bruno")),
            ("Sobrenome", json!("Lima")),
            ("Cargo", json!("Gerente de Vendas")),
            ("Empresa", json!("VendeMais")),
            ("Cidade", json!("Rio de Janeiro")),
            ("Setor", json!("Varejo")),
            ("Funcionários", json!(35)),
        ]),
        // Missing last name makes this row unusable.
        row(&[
            ("Nome", json!("Carla")),
            ("Cargo", json!("CFO")),
            ("Empresa", json!("FinCo")),
        ]),
    ]
}

#[test]
fn unusable_rows_are_dropped_before_filtering() {
    let outcome = filter_rows(&portuguese_sheet(), &params("", "", "", "all", 25));
    assert_eq!(outcome.usable_rows, 2);
    assert_eq!(outcome.leads.len(), 2);
}

#[test]
fn predicates_combine_with_and() {
    let outcome = filter_rows(
        &portuguese_sheet(),
        &params("diretora", "sao paulo", "tecnologia", "51-200", 25),
    );
    assert_eq!(outcome.leads.len(), 1);
    assert_eq!(outcome.leads[0].full_name, "Ana Souza");

    // Same title and location but the wrong bucket.
    let outcome = filter_rows(
        &portuguese_sheet(),
        &params("diretora", "sao paulo", "tecnologia", "1-10", 25),
    );
    assert!(outcome.leads.is_empty());
    assert_eq!(outcome.usable_rows, 2);
}

#[test]
fn location_matching_ignores_accents_and_case() {
    let outcome = filter_rows(&portuguese_sheet(), &params("", "SÃO PAULO", "", "all", 25));
    assert_eq!(outcome.leads.len(), 1);
    let outcome = filter_rows(&portuguese_sheet(), &params("", "sao paulo", "", "all", 25));
    assert_eq!(outcome.leads.len(), 1);
}

#[test]
fn numeric_employee_cells_bucket_by_first_integer() {
    let outcome = filter_rows(&portuguese_sheet(), &params("", "", "", "11-50", 25));
    assert_eq!(outcome.leads.len(), 1);
    assert_eq!(outcome.leads[0].full_name, "Bruno Lima");
}

#[test]
fn corrupt_tokens_are_scrubbed_from_output() {
    let rows = vec![row(&[
        ("First Name", json!("Ana")),
        ("Last Name", json!("Souza")),
        ("Title", json!("Diretora MILÍMETROS de Tecnologia")),
        ("Company", json!("Acme® Corp")),
    ])];
    let outcome = filter_rows(&rows, &params("", "", "", "all", 25));
    assert_eq!(outcome.leads.len(), 1);
    assert_eq!(outcome.leads[0].job_title, "Diretora de Tecnologia");
    assert_eq!(outcome.leads[0].company, "Acme Corp");
}

#[test]
fn profile_urls_survive_sanitization() {
    let rows = vec![row(&[
        ("First Name", json!("Ana")),
        ("Last Name", json!("Souza")),
        ("Title", json!("CTO")),
        ("Company", json!("Acme")),
        ("LinkedIn URL", json!("https://linkedin.com/in/ana?trk=x")),
    ])];
    let outcome = filter_rows(&rows, &params("", "", "", "all", 25));
    assert_eq!(outcome.leads[0].profile_url, "https://linkedin.com/in/ana?trk=x");
}

#[test]
fn limit_slices_after_filtering() {
    let rows: Vec<Map<String, Value>> = (0..40)
        .map(|i| {
            row(&[
                ("First Name", json!(format!("Person{}", i))),
                ("Last Name", json!("Test")),
                ("Title", json!("CTO")),
                ("Company", json!("Acme")),
            ])
        })
        .collect();
    let outcome = filter_rows(&rows, &params("cto", "", "", "all", 5));
    assert_eq!(outcome.usable_rows, 40);
    assert_eq!(outcome.leads.len(), 5);
}

#[test]
fn every_lead_gets_a_fresh_id_and_sentinels() {
    let rows = vec![row(&[
        ("First Name", json!("Ana")),
        ("Last Name", json!("Souza")),
        ("Title", json!("CTO")),
        ("Company", json!("Acme")),
    ])];
    let first = filter_rows(&rows, &params("", "", "", "all", 25));
    let second = filter_rows(&rows, &params("", "", "", "all", 25));
    assert_ne!(first.leads[0].id, second.leads[0].id);
    assert_eq!(first.leads[0].location, "Location not available");
    assert_eq!(first.leads[0].industry, "Industry not specified");
    assert_eq!(first.leads[0].employee_count, "N/A");
}

#[test]
fn title_filter_accepts_synonyms() {
    let rows = vec![row(&[
        ("First Name", json!("Ana")),
        ("Last Name", json!("Souza")),
        ("Title", json!("Chief Technology Officer")),
        ("Company", json!("Acme")),
    ])];
    let outcome = filter_rows(&rows, &params("cto", "", "", "all", 25));
    assert_eq!(outcome.leads.len(), 1);
}
