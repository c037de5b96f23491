use crate::models::Bill;

/// Sample bills used by the demo store and the tests.
pub fn fixture_bills() -> Vec<Bill> {
    vec![
        Bill {
            id: "47qAXb6fIm2zOKkLzMro".to_string(),
            email: "a@a".to_string(),
            bill_type: "Hôtel et logement".to_string(),
            name: "encore".to_string(),
            amount: 400,
            date: "2004-04-04".to_string(),
            vat: "80".to_string(),
            pct: 20,
            commentary: "séminaire billed".to_string(),
            file_url: "https://test.storage.tld/v0/b/billable/receipts/preview-facture-free-201801-pdf-1.jpg"
                .to_string(),
            file_name: "preview-facture-free-201801-pdf-1.jpg".to_string(),
            status: "pending".to_string(),
            comment_admin: Some("ok".to_string()),
        },
        Bill {
            id: "BeKy5Mo4jkmdfPGYpTxZ".to_string(),
            email: "a@a".to_string(),
            bill_type: "Transports".to_string(),
            name: "test1".to_string(),
            amount: 100,
            date: "2001-01-01".to_string(),
            vat: String::new(),
            pct: 20,
            commentary: "plop".to_string(),
            file_url: "https://test.storage.tld/v0/b/billable/receipts/1592770761.jpeg".to_string(),
            file_name: "1592770761.jpeg".to_string(),
            status: "refused".to_string(),
            comment_admin: Some("en fait non".to_string()),
        },
        Bill {
            id: "UIUZtnPQvnbFnB0ozvJh".to_string(),
            email: "a@a".to_string(),
            bill_type: "Services en ligne".to_string(),
            name: "test3".to_string(),
            amount: 300,
            date: "2003-03-03".to_string(),
            vat: "60".to_string(),
            pct: 20,
            commentary: String::new(),
            file_url: "https://test.storage.tld/v0/b/billable/receipts/facture-client-php-exportee.png"
                .to_string(),
            file_name: "facture-client-php-exportee.png".to_string(),
            status: "accepted".to_string(),
            comment_admin: Some("bon bah d'accord".to_string()),
        },
        Bill {
            id: "qcCK3SzECmaZAGRrHjaC".to_string(),
            email: "a@a".to_string(),
            bill_type: "Restaurants et bars".to_string(),
            name: "test2".to_string(),
            amount: 200,
            date: "2002-02-02".to_string(),
            vat: "40".to_string(),
            pct: 20,
            commentary: "test2".to_string(),
            file_url: "https://test.storage.tld/v0/b/billable/receipts/preview-facture-free-201801-pdf-1.jpg"
                .to_string(),
            file_name: "preview-facture-free-201801-pdf-1.jpg".to_string(),
            status: "refused".to_string(),
            comment_admin: Some("pas la bonne facture".to_string()),
        },
    ]
}
