//! Repository Integration Tests
//!
//! Runs the repositories against an in-memory SQLite database.

#[cfg(test)]
mod tests {
    use crate::domain::{Container, DomainError, Equipment, Membership, MembershipKind};
    use crate::repository::{
        init_db, ContainerRepository, DbState, EquipmentRepository, MembershipRepository, OrgFeed,
        OrganizationRepository, ReassignmentStore, Repository, SqliteReassignmentStore,
    };
    use std::path::Path;
    use std::sync::Arc;

    struct Fixture {
        db: DbState,
        memberships: MembershipRepository,
        containers: ContainerRepository,
        equipment: EquipmentRepository,
    }

    async fn setup_test_db() -> Fixture {
        let db = init_db(Path::new(":memory:")).await.expect("Failed to init test DB");
        Fixture {
            memberships: MembershipRepository::new(db.connection()),
            containers: ContainerRepository::new(db.connection()),
            equipment: EquipmentRepository::new(db.connection()),
            db,
        }
    }

    /// Two members and a storage in org 1, a member in org 2
    async fn seed(f: &Fixture) -> (Membership, Membership, Membership, Membership) {
        let alice = f
            .memberships
            .create(&Membership::new(0, 1, "Alice".into(), MembershipKind::Member))
            .await
            .unwrap();
        let bob = f
            .memberships
            .create(&Membership::new(0, 1, "Bob".into(), MembershipKind::Member))
            .await
            .unwrap();
        let shelf = f
            .memberships
            .create(&Membership::new(0, 1, "Shelf".into(), MembershipKind::Storage))
            .await
            .unwrap();
        let other = f
            .memberships
            .create(&Membership::new(0, 2, "Zed".into(), MembershipKind::Member))
            .await
            .unwrap();
        (alice, bob, shelf, other)
    }

    #[tokio::test]
    async fn test_create_and_find_membership() {
        let f = setup_test_db().await;
        let (alice, _, shelf, _) = seed(&f).await;

        assert!(alice.id > 0);
        let found = f.memberships.find_by_id(shelf.id).await.unwrap().unwrap();
        assert_eq!(found.holder_name, "Shelf");
        assert_eq!(found.kind, MembershipKind::Storage);
        assert!(f.memberships.find_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_organization() {
        let f = setup_test_db().await;
        let (alice, _, _, other) = seed(&f).await;
        f.equipment.create(&Equipment::new(0, 1, alice.id, "Drill".into())).await.unwrap();
        f.equipment.create(&Equipment::new(0, 2, other.id, "Saw".into())).await.unwrap();

        assert_eq!(f.memberships.list_by_organization(1).await.unwrap().len(), 3);
        let org2 = f.equipment.list_by_organization(2).await.unwrap();
        assert_eq!(org2.len(), 1);
        assert_eq!(org2[0].name, "Saw");
        assert_eq!(f.equipment.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_equipment_is_not_found() {
        let f = setup_test_db().await;
        let ghost = Equipment::new(42, 1, 1, "Ghost".into());
        let err = f.equipment.update(&ghost).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unknown_owner_violates_foreign_key() {
        let f = setup_test_db().await;
        let err = f.equipment.create(&Equipment::new(0, 1, 77, "Orphan".into())).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_container_keeps_contents_loose() {
        let f = setup_test_db().await;
        let (alice, _, _, _) = seed(&f).await;
        let case = f
            .containers
            .create(&Container::new(0, 1, alice.id, "Case".into()))
            .await
            .unwrap();
        let bit = f
            .equipment
            .create(&Equipment::new(0, 1, alice.id, "Bit".into()).in_container(case.id))
            .await
            .unwrap();

        f.containers.delete(case.id).await.unwrap();

        let bit = f.equipment.find_by_id(bit.id).await.unwrap().unwrap();
        assert_eq!(bit.container_id, None);
        assert_eq!(bit.owner_id, alice.id);
        assert!(f.containers.find_by_id(case.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reassign_selected_equipment_only() {
        let f = setup_test_db().await;
        let (alice, bob, _, _) = seed(&f).await;
        let mut ids = Vec::new();
        for _ in 0..3 {
            let ladder = Equipment::new(0, 1, bob.id, "Ladder".into());
            ids.push(f.equipment.create(&ladder).await.unwrap().id);
        }
        let store = SqliteReassignmentStore::new(f.db.connection());

        let written = store.reassign_equipment(&[ids[0], ids[2]], alice.id, None).await.unwrap();

        assert_eq!(written, 2);
        let owners: Vec<u32> = {
            let mut v = Vec::new();
            for id in &ids {
                v.push(f.equipment.find_by_id(*id).await.unwrap().unwrap().owner_id);
            }
            v
        };
        assert_eq!(owners, vec![alice.id, bob.id, alice.id]);
    }

    #[tokio::test]
    async fn test_reassign_into_container_sets_both_references() {
        let f = setup_test_db().await;
        let (alice, bob, _, _) = seed(&f).await;
        let bag = f.containers.create(&Container::new(0, 1, alice.id, "Bag".into())).await.unwrap();
        let cable = f
            .equipment
            .create(&Equipment::new(0, 1, bob.id, "Cable".into()))
            .await
            .unwrap();
        let store = SqliteReassignmentStore::new(f.db.connection());

        store.reassign_equipment(&[cable.id], alice.id, Some(bag.id)).await.unwrap();

        let cable_after = f.equipment.find_by_id(cable.id).await.unwrap().unwrap();
        assert_eq!(cable_after.owner_id, alice.id);
        assert_eq!(cable_after.container_id, Some(bag.id));
        assert!(cable_after.updated_at >= cable.updated_at);
    }

    #[tokio::test]
    async fn test_reassign_rejects_container_of_another_holder() {
        let f = setup_test_db().await;
        let (alice, bob, _, _) = seed(&f).await;
        let bag = f.containers.create(&Container::new(0, 1, bob.id, "Bag".into())).await.unwrap();
        let cable = f
            .equipment
            .create(&Equipment::new(0, 1, bob.id, "Cable".into()))
            .await
            .unwrap();
        let store = SqliteReassignmentStore::new(f.db.connection());

        let err = store.reassign_equipment(&[cable.id], alice.id, Some(bag.id)).await.unwrap_err();

        assert!(matches!(err, DomainError::InvalidInput(_)));
        let cable = f.equipment.find_by_id(cable.id).await.unwrap().unwrap();
        assert_eq!(cable.owner_id, bob.id);
        assert_eq!(cable.container_id, None);
    }

    #[tokio::test]
    async fn test_reassign_equipment_rolls_back_on_missing_record() {
        let f = setup_test_db().await;
        let (alice, bob, _, _) = seed(&f).await;
        let rope = f.equipment.create(&Equipment::new(0, 1, bob.id, "Rope".into())).await.unwrap();
        let store = SqliteReassignmentStore::new(f.db.connection());

        let err = store.reassign_equipment(&[rope.id, 9999], alice.id, None).await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound(_)));
        let rope = f.equipment.find_by_id(rope.id).await.unwrap().unwrap();
        assert_eq!(rope.owner_id, bob.id);
    }

    #[tokio::test]
    async fn test_reassign_rejects_cross_organization_targets() {
        let f = setup_test_db().await;
        let (alice, _, _, other) = seed(&f).await;
        let rope = f
            .equipment
            .create(&Equipment::new(0, 1, alice.id, "Rope".into()))
            .await
            .unwrap();
        let store = SqliteReassignmentStore::new(f.db.connection());

        let err = store.reassign_equipment(&[rope.id], other.id, None).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        assert_eq!(f.equipment.find_by_id(rope.id).await.unwrap().unwrap().owner_id, alice.id);
    }

    #[tokio::test]
    async fn test_reassign_container_cascades_to_contents() {
        let f = setup_test_db().await;
        let (alice, _, shelf, _) = seed(&f).await;
        let kit = f
            .containers
            .create(&Container::new(0, 1, shelf.id, "First aid".into()))
            .await
            .unwrap();
        for name in ["Gauze", "Gauze", "Tape", "Scissors"] {
            f.equipment
                .create(&Equipment::new(0, 1, shelf.id, name.into()).in_container(kit.id))
                .await
                .unwrap();
        }
        let loose = f
            .equipment
            .create(&Equipment::new(0, 1, shelf.id, "Torch".into()))
            .await
            .unwrap();
        let store = SqliteReassignmentStore::new(f.db.connection());

        let nested = store.reassign_container(kit.id, alice.id).await.unwrap();

        assert_eq!(nested, 4);
        assert_eq!(f.containers.find_by_id(kit.id).await.unwrap().unwrap().owner_id, alice.id);
        for record in f.equipment.list_in_container(kit.id).await.unwrap() {
            assert_eq!(record.owner_id, alice.id);
            assert_eq!(record.container_id, Some(kit.id));
        }
        assert_eq!(f.equipment.find_by_id(loose.id).await.unwrap().unwrap().owner_id, shelf.id);
    }

    #[tokio::test]
    async fn test_container_reassignment_is_all_or_nothing() {
        let f = setup_test_db().await;
        let (alice, bob, _, _) = seed(&f).await;
        let crate_box = f
            .containers
            .create(&Container::new(0, 1, bob.id, "Crate".into()))
            .await
            .unwrap();
        for _ in 0..3 {
            f.equipment
                .create(&Equipment::new(0, 1, bob.id, "Clamp".into()).in_container(crate_box.id))
                .await
                .unwrap();
        }
        {
            // Fail after the container row is written, before any contents are
            let guard = f.db.conn.lock().await;
            guard
                .as_ref()
                .unwrap()
                .execute_batch(
                    "CREATE TRIGGER fail_contents BEFORE UPDATE OF owner_id ON equipment
                     BEGIN SELECT RAISE(ABORT, 'simulated failure'); END;",
                )
                .unwrap();
        }
        let store = SqliteReassignmentStore::new(f.db.connection());

        let result = store.reassign_container(crate_box.id, alice.id).await;

        assert!(result.is_err());
        assert_eq!(f.containers.find_by_id(crate_box.id).await.unwrap().unwrap().owner_id, bob.id);
        for record in f.equipment.list_in_container(crate_box.id).await.unwrap() {
            assert_eq!(record.owner_id, bob.id);
        }
    }

    #[tokio::test]
    async fn test_feed_republishes_after_commit() {
        let f = setup_test_db().await;
        let (alice, bob, _, _) = seed(&f).await;
        let lamp = f.equipment.create(&Equipment::new(0, 1, bob.id, "Lamp".into())).await.unwrap();
        let feed = Arc::new(OrgFeed::new(f.db.connection(), 1));
        feed.refresh().await.unwrap();
        let mut rx = feed.subscribe();
        assert_eq!(rx.borrow_and_update().memberships.len(), 3);

        let store = SqliteReassignmentStore::new(f.db.connection()).with_feed(Arc::clone(&feed));
        store.reassign_equipment(&[lamp.id], alice.id, None).await.unwrap();

        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.revision, 2);
        assert_eq!(snapshot.equipment[0].owner_id, alice.id);
    }
}
