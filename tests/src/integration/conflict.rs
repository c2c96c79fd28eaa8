//! # Double-Spend Races
//!
//! Two transfers built from the same unspent snapshot race to the notary;
//! exactly one must finalize and the loser must observe a conflict, with
//! no partial state left behind. Transfers on distinct lineages must not
//! interfere with each other.

#[cfg(test)]
mod tests {
    use crate::integration::TestLedger;
    use dc_02_transfer_coordination::{
        CoordinationError, SequencerError, TransferCoordinationApi, VaultStore,
    };
    use shared_types::{AssetFacts, FinalizedTransition};

    fn oak_street() -> AssetFacts {
        AssetFacts::new("12 Oak St", "1200sqft", 3, 2020)
    }

    #[tokio::test]
    async fn test_concurrent_transfers_of_one_record_accept_exactly_one() {
        let ledger = TestLedger::new();
        let seller = ledger.join(1);
        let buyer_a = ledger.join(2);
        let buyer_b = ledger.join(3);

        ledger
            .initiator(&seller)
            .issue(oak_street())
            .await
            .unwrap();

        // Stage both transfers from the same snapshot: a replica of the
        // seller holds the same unspent record in a second vault, so both
        // runs reach the notary regardless of interleaving.
        let snapshot = seller
            .vault
            .find_unspent("12 Oak St")
            .await
            .unwrap()
            .unwrap();
        let seller_replica = ledger.replica(&seller);
        seller_replica.vault.seed(snapshot.clone());

        let primary = ledger.initiator(&seller);
        let replica = ledger.initiator(&seller_replica);

        let (left, right) = tokio::join!(
            primary.transfer("12 Oak St", buyer_a.id()),
            replica.transfer("12 Oak St", buyer_b.id()),
        );

        let results = [left, right];
        let winners: Vec<&FinalizedTransition> =
            results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1, "exactly one transfer must finalize");

        let loser = results
            .iter()
            .find_map(|r| r.as_ref().err())
            .expect("one transfer must be rejected");
        assert!(matches!(
            loser,
            CoordinationError::Sequencer(SequencerError::Conflict { record_ref })
                if *record_ref == snapshot.record.record_ref
        ));

        // Issue plus exactly one transfer were sequenced.
        assert_eq!(ledger.notary.accepted_count().await, 2);
        assert!(ledger.notary.is_consumed(snapshot.record.record_ref).await);

        // Every participant converged on the winner's output.
        let winning_owner = winners[0].output().unwrap().owner;
        assert!(winning_owner == buyer_a.id() || winning_owner == buyer_b.id());
        let seller_view = seller
            .vault
            .find_unspent("12 Oak St")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(seller_view.record.owner, winning_owner);

        // The losing buyer saw no broadcast.
        let losing_buyer = if winning_owner == buyer_a.id() {
            &buyer_b
        } else {
            &buyer_a
        };
        assert!(losing_buyer
            .vault
            .find_unspent("12 Oak St")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_transfers_on_distinct_lineages_do_not_conflict() {
        let ledger = TestLedger::new();
        let seller = ledger.join(1);
        let buyer = ledger.join(2);

        ledger
            .initiator(&seller)
            .issue(oak_street())
            .await
            .unwrap();
        ledger
            .initiator(&seller)
            .issue(AssetFacts::new("7 Elm Ave", "900sqft", 2, 1998))
            .await
            .unwrap();

        let service = ledger.initiator(&seller);
        let (oak, elm) = tokio::join!(
            service.transfer("12 Oak St", buyer.id()),
            service.transfer("7 Elm Ave", buyer.id()),
        );

        assert!(oak.is_ok());
        assert!(elm.is_ok());
        assert_eq!(ledger.notary.accepted_count().await, 4);

        let oak_view = buyer
            .vault
            .find_unspent("12 Oak St")
            .await
            .unwrap()
            .unwrap();
        let elm_view = buyer
            .vault
            .find_unspent("7 Elm Ave")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(oak_view.record.owner, buyer.id());
        assert_eq!(elm_view.record.owner, buyer.id());
    }
}
