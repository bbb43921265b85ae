//! Deterministic scenarios replaying the deployment script and the
//! carry-over edge cases around it.

use drops_core::traits::CashAsset;
use drops_core::units::{format_units, parse_units};
use drops_pool::{DropsPool, LinearWeighting, PoolConfig, SqrtWeighting};
use drops_tests::helpers::*;

fn units(amount: &str) -> u128 {
    parse_units(amount, 18).unwrap()
}

fn show(amount: u128) -> String {
    format_units(amount, 18)
}

// ---------------------------------------------------------------------------
// Deployment script
// ---------------------------------------------------------------------------

#[test]
fn deployment_script_oracle() {
    let mut pool = funded_pool();
    let sqrt = SqrtWeighting::new();
    let (a, b) = (addr(0xA1), addr(0xB2));

    // 1. Unenrolled minter deposits 100.
    pool.mint(&admin(), &admin(), units("100")).unwrap();
    assert_eq!(show(pool.balance_of(&admin())), "100.0");
    assert_eq!(show(pool.pool_cash()), "100.0");
    assert_eq!(pool.total_weighted_shares(), 0);
    assert_invariants(&pool, &sqrt);

    // 2. Enrolling empty accounts moves nothing.
    pool.enroll(a).unwrap();
    pool.enroll(b).unwrap();
    assert_eq!(pool.total_weighted_shares(), 0);
    assert_eq!(show(pool.pool_cash()), "100.0");

    // 3. A becomes the first participant and inherits the pool.
    pool.transfer(&admin(), &a, units("1.0")).unwrap();
    assert_eq!(format_units(pool.share_balance_of(&a), 9), "1.0");
    assert_eq!(show(pool.withdrawable_cash_of(&a).unwrap()), "100.0");
    assert_invariants(&pool, &sqrt);

    // 4.
    pool.withdraw(&a, units("1.0")).unwrap();
    assert_eq!(show(pool.pool_cash()), "99.0");

    // 5. B dilutes into an already claimed pool.
    pool.transfer(&admin(), &b, units("1.0")).unwrap();
    assert_eq!(format_units(pool.share_balance_of(&b), 9), "1.0");
    assert_eq!(show(pool.withdrawable_cash_of(&b).unwrap()), "0.0");
    assert_invariants(&pool, &sqrt);

    // 6. A fresh deposit splits evenly between equal shares.
    pool.mint(&admin(), &admin(), units("100")).unwrap();
    assert_eq!(show(pool.pool_cash()), "199.0");
    assert_eq!(show(pool.withdrawable_cash_of(&b).unwrap()), "50.0");

    // 7.
    pool.withdraw(&b, units("50.0")).unwrap();
    assert_eq!(show(pool.withdrawable_cash_of(&b).unwrap()), "0.0");
    assert_eq!(show(pool.withdrawable_cash_of(&a).unwrap()), "99.0");
    assert_invariants(&pool, &sqrt);

    assert_eq!(show(pool.cash().balance_of(&admin())), "800.0");
    assert_eq!(show(pool.cash().balance_of(&a)), "1.0");
    assert_eq!(show(pool.cash().balance_of(&b)), "50.0");
}

#[test]
fn oracle_withdrawals_beyond_claim_fail() {
    let mut pool = funded_pool();
    let (a, b) = (addr(0xA1), addr(0xB2));
    pool.mint(&admin(), &admin(), units("100")).unwrap();
    pool.enroll(a).unwrap();
    pool.enroll(b).unwrap();
    pool.transfer(&admin(), &a, units("1")).unwrap();
    pool.transfer(&admin(), &b, units("1")).unwrap();

    assert!(pool.withdraw(&b, 1).is_err());
    assert!(pool.withdraw(&a, units("50") + 1).is_err());
    pool.withdraw(&a, units("50")).unwrap();
    assert_eq!(pool.withdrawable_cash_of(&a).unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Carry-over
// ---------------------------------------------------------------------------

#[test]
fn second_deposit_before_any_enrollment() {
    let mut pool = funded_pool();
    let (a, b) = (addr(0xA1), addr(0xB2));
    pool.mint(&admin(), &admin(), units("100")).unwrap();
    pool.mint(&admin(), &admin(), units("50")).unwrap();
    assert_eq!(pool.distributable_cash(), units("150"));

    pool.enroll(a).unwrap();
    pool.transfer(&admin(), &a, units("4")).unwrap();
    assert_eq!(show(pool.withdrawable_cash_of(&a).unwrap()), "150.0");

    pool.enroll(b).unwrap();
    pool.transfer(&admin(), &b, units("4")).unwrap();
    assert_eq!(show(pool.withdrawable_cash_of(&b).unwrap()), "0.0");
    assert_invariants(&pool, &SqrtWeighting::new());
}

#[test]
fn enrolling_existing_holder_as_first_participant_takes_carry_over() {
    let mut pool = funded_pool();
    let a = addr(0xA1);
    pool.mint(&admin(), &a, units("9")).unwrap();
    assert_eq!(pool.withdrawable_cash_of(&a).unwrap(), 0);

    pool.enroll(a).unwrap();
    assert_eq!(pool.total_weighted_shares(), 3_000_000_000);
    assert_eq!(show(pool.withdrawable_cash_of(&a).unwrap()), "9.0");
}

#[test]
fn carry_over_after_everyone_leaves() {
    let mut pool = funded_pool();
    let (a, b) = (addr(0xA1), addr(0xB2));
    pool.enroll(a).unwrap();
    pool.mint(&admin(), &a, units("1")).unwrap();
    assert_eq!(show(pool.withdrawable_cash_of(&a).unwrap()), "1.0");

    // A hands its whole balance to a non-member; the pool has no shares left.
    pool.transfer(&a, &admin(), units("1")).unwrap();
    assert_eq!(pool.total_weighted_shares(), 0);
    assert_eq!(pool.distributable_cash(), 0);
    assert_eq!(show(pool.withdrawable_cash_of(&a).unwrap()), "1.0");

    // Cash deposited while nobody holds shares waits for the next participant.
    pool.mint(&admin(), &admin(), units("10")).unwrap();
    pool.enroll(b).unwrap();
    pool.transfer(&admin(), &b, units("1")).unwrap();
    assert_eq!(show(pool.withdrawable_cash_of(&b).unwrap()), "10.0");
    assert_eq!(show(pool.withdrawable_cash_of(&a).unwrap()), "1.0");
    assert_eq!(show(pool.pool_cash()), "11.0");
    assert_invariants(&pool, &SqrtWeighting::new());

    assert_eq!(drain(&mut pool, &a).unwrap(), units("1"));
    assert_eq!(drain(&mut pool, &b).unwrap(), units("10"));
    assert_eq!(pool.pool_cash(), 0);
}

#[test]
fn leaving_member_keeps_settled_claim() {
    let mut pool = funded_pool();
    let (a, b) = (addr(0xA1), addr(0xB2));
    pool.enroll(a).unwrap();
    pool.enroll(b).unwrap();
    pool.mint(&admin(), &a, units("1")).unwrap();
    pool.mint(&admin(), &b, units("1")).unwrap();
    pool.mint(&admin(), &admin(), units("20")).unwrap();
    let a_before = pool.withdrawable_cash_of(&a).unwrap();
    let b_before = pool.withdrawable_cash_of(&b).unwrap();

    pool.transfer(&a, &admin(), units("1")).unwrap();
    assert_eq!(pool.share_balance_of(&a), 0);
    assert_eq!(pool.withdrawable_cash_of(&a).unwrap(), a_before);
    assert_eq!(pool.withdrawable_cash_of(&b).unwrap(), b_before);

    // Later deposits go to the remaining holder only.
    pool.mint(&admin(), &admin(), units("6")).unwrap();
    assert_eq!(pool.withdrawable_cash_of(&a).unwrap(), a_before);
    assert_eq!(pool.withdrawable_cash_of(&b).unwrap(), b_before + units("6"));
    assert_invariants(&pool, &SqrtWeighting::new());
}

// ---------------------------------------------------------------------------
// Weighting
// ---------------------------------------------------------------------------

#[test]
fn linear_weighting_regression() {
    let config = PoolConfig::default();
    let cash = funded_cash(&config.custody);
    let mut pool = DropsPool::with_weighting(config, cash, LinearWeighting).unwrap();
    let (a, b) = (addr(0xA1), addr(0xB2));

    pool.mint(&admin(), &admin(), units("100")).unwrap();
    pool.enroll(a).unwrap();
    pool.enroll(b).unwrap();
    pool.transfer(&admin(), &a, units("1")).unwrap();
    assert_eq!(show(pool.withdrawable_cash_of(&a).unwrap()), "100.0");
    pool.withdraw(&a, units("1")).unwrap();

    // B holds three times A's balance and gets three times the weight.
    pool.transfer(&admin(), &b, units("3")).unwrap();
    pool.mint(&admin(), &admin(), units("100")).unwrap();
    assert_eq!(show(pool.withdrawable_cash_of(&b).unwrap()), "75.0");
    assert_eq!(show(pool.withdrawable_cash_of(&a).unwrap()), "49.0");
    assert_invariants(&pool, &LinearWeighting);
}

#[test]
fn sqrt_weighting_halves_share_precision() {
    let pool = funded_pool();
    assert_eq!(pool.decimals(), 18);
    assert_eq!(pool.share_decimals(), 9);
    assert_eq!(pool.name(), "Drops");
    assert_eq!(pool.symbol(), "DROP");
}
