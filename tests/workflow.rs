//! End-to-end behavior of the repositories over an in-memory store.

use std::sync::Arc;

use aufmass::{Error, Measurement, Position, PositionDraft, Project, SharedFields, Store};

fn products(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn new_project(store: &Store, name: &str) -> i64 {
    store.projects().save(&mut Project::new(name)).unwrap()
}

fn create(store: &Store, project_id: i64, items: &[&str]) -> String {
    store
        .positions()
        .create_main(PositionDraft {
            project_id,
            shared: SharedFields::named("Wohnzimmer"),
            products: products(items),
            ..Default::default()
        })
        .unwrap()
}

fn sub_products(store: &Store, main_id: &str) -> Vec<(String, String)> {
    store
        .positions()
        .sub_positions(main_id)
        .unwrap()
        .into_iter()
        .map(|p| (p.id, p.product))
        .collect()
}

#[test]
fn project_save_assigns_id() {
    let store = Store::open_in_memory().unwrap();
    let id = new_project(&store, "Alpha");
    assert!(id > 0);
    assert_eq!(store.projects().get(id).unwrap().unwrap().name, "Alpha");
}

#[test]
fn main_position_with_accessories_then_shrink() {
    let store = Store::open_in_memory().unwrap();
    let project_id = new_project(&store, "Alpha");
    let id = create(&store, project_id, &["Fenster Standard", "Rollladen", "Insektenschutz"]);
    assert_eq!(id, "1");

    let main = store.positions().get("1").unwrap().unwrap();
    assert_eq!(main.product, "Fenster Standard");
    assert!(main.accessories.is_empty());
    assert_eq!(
        sub_products(&store, "1"),
        vec![
            ("1.1".to_string(), "Rollladen".to_string()),
            ("1.2".to_string(), "Insektenschutz".to_string()),
        ]
    );

    let mut main = main;
    store
        .positions()
        .update_main(&mut main, &products(&["Fenster Standard", "Insektenschutz"]))
        .unwrap();
    assert_eq!(
        sub_products(&store, "1"),
        vec![("1.1".to_string(), "Insektenschutz".to_string())]
    );
}

#[test]
fn measurement_area_and_perimeter() {
    let store = Store::open_in_memory().unwrap();
    let project_id = new_project(&store, "Alpha");
    create(&store, project_id, &["Fenster Standard"]);

    let mut m = Measurement::for_position("1", project_id);
    m.inner_width = 1200;
    m.inner_height = 1000;
    let id = store.measurements().save(&mut m).unwrap();

    let loaded = store.measurements().get(id).unwrap().unwrap();
    assert_eq!(loaded.area(), 1.20);
    assert_eq!(loaded.perimeter(), 4.40);
}

#[test]
fn malformed_product_ids_read_as_empty() {
    let store = Store::open_in_memory().unwrap();
    let project_id = new_project(&store, "Alpha");
    let mut pos = Position {
        id: "1".into(),
        project_id,
        name: "Flur".into(),
        product_ids: vec![3],
        ..Default::default()
    };
    store.positions().save(&mut pos).unwrap();
    store
        .submit(|conn| {
            conn.execute("UPDATE positions SET product_ids = '[1,2' WHERE id = '1'", [])?;
            Ok(())
        })
        .unwrap();

    assert!(store.positions().get("1").unwrap().unwrap().product_ids.is_empty());
}

#[test]
fn project_delete_cascades() {
    let store = Store::open_in_memory().unwrap();
    let alpha = new_project(&store, "Alpha");
    let beta = new_project(&store, "Beta");
    create(&store, alpha, &["Fenster", "Rollladen"]);
    let other = create(&store, beta, &["Fenster"]);
    store
        .measurements()
        .save(&mut Measurement::for_position("1.1", alpha))
        .unwrap();

    assert!(store.projects().delete(alpha).unwrap());
    assert!(store.positions().list_by_project(alpha).unwrap().is_empty());
    assert!(store.measurements().list_by_project(alpha).unwrap().is_empty());
    assert!(store.positions().exists(&other).unwrap());

    let stats = store.stats().unwrap();
    assert_eq!((stats.projects, stats.positions, stats.measurements), (1, 1, 0));
}

#[test]
fn main_delete_cascades_to_sub_measurements() {
    let store = Store::open_in_memory().unwrap();
    let project_id = new_project(&store, "Alpha");
    create(&store, project_id, &["Fenster", "Rollladen", "Raffstore"]);
    for id in ["1", "1.1", "1.2"] {
        store
            .measurements()
            .save(&mut Measurement::for_position(id, project_id))
            .unwrap();
    }

    assert!(store.positions().delete("1").unwrap());
    assert_eq!(store.stats().unwrap().measurements, 0);
}

#[test]
fn shrinking_drops_measurements_of_removed_subs() {
    let store = Store::open_in_memory().unwrap();
    let project_id = new_project(&store, "Alpha");
    create(&store, project_id, &["Fenster", "Rollladen", "Raffstore"]);
    store
        .measurements()
        .save(&mut Measurement::for_position("1.2", project_id))
        .unwrap();

    let mut main = store.positions().get("1").unwrap().unwrap();
    store
        .positions()
        .update_main(&mut main, &products(&["Fenster", "Rollladen"]))
        .unwrap();
    assert!(store.measurements().get_by_position("1.2").unwrap().is_none());
}

#[test]
fn failing_operation_does_not_stop_the_store() {
    let store = Store::open_in_memory().unwrap();
    let failed = store.submit(|conn| {
        conn.execute("INSERT INTO nowhere VALUES (1)", [])?;
        Ok(())
    });
    assert!(matches!(failed, Err(Error::Storage(_))));

    let panicked: aufmass::Result<()> = store.submit(|_| panic!("broken operation"));
    assert!(matches!(panicked, Err(Error::WorkerFailed(_))));

    assert!(new_project(&store, "Still here") > 0);
}

#[test]
fn concurrent_reconciliation_of_one_main_position() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    let project_id = new_project(&store, "Alpha");
    create(&store, project_id, &["Fenster"]);

    let selections = [
        vec!["Fenster", "A", "B", "C"],
        vec!["Fenster", "A"],
        vec!["Fenster", "X", "Y"],
        vec!["Fenster"],
    ];
    let handles: Vec<_> = selections
        .iter()
        .map(|selection| {
            let store = Arc::clone(&store);
            let selection = products(selection);
            std::thread::spawn(move || {
                for _ in 0..10 {
                    let mut main = store.positions().get("1").unwrap().unwrap();
                    store.positions().update_main(&mut main, &selection).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // whatever call ran last, the subs form a contiguous 1..n sequence
    let subs = store.positions().sub_positions("1").unwrap();
    for (i, sub) in subs.iter().enumerate() {
        assert_eq!(sub.id, format!("1.{}", i + 1));
        assert_eq!(sub.parent_id.as_deref(), Some("1"));
    }
    assert!(subs.len() <= 3);
}
