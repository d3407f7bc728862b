//! Property-based tests using `proptest` for rebalancing invariants.
//!
//! 1. **Conservation** — `cash + managed` is unchanged by any rebalance.
//! 2. **Idempotence** — a second forced rebalance moves nothing.
//! 3. **Target reached** — after a forced rebalance the investable room is
//!    zero, and lowering the target makes it negative by the exact gap.
//! 4. **Config ordering** — a config is accepted iff
//!    `lower ≤ target ≤ upper ≤ 1e18`, and its blob decodes exactly.
//!
//! Properties 1 and 2 also run against a yield vault priced above par,
//! where conservation holds up to the vault's rounding.

#![allow(clippy::panic)]

use std::rc::Rc;

use proptest::prelude::*;

use crate::config::{ConfigBlob, InvestmentConfig};
use crate::domain::{Address, Amount, CallContext, Fraction, PoolId, SignedAmount};
use crate::manager::{AssetManager, AssetManagerBuilder};
use crate::math::Rounding;
use crate::sim::{
    InMemoryVault, MockAdapter, SettlementPolicy, TokenBank, TokenRegistration, YieldVaultAdapter,
};
use crate::traits::{InvestmentAdapter, JoinRequest, Ledger};
use crate::unit_of_work::UnitOfWork;

const DAI: Address = Address::repeat_byte(0xd1);
const USDC: Address = Address::repeat_byte(0xc1);
const VAULT: Address = Address::repeat_byte(0x0f);
const OWNER: Address = Address::repeat_byte(0x01);
const POOL: Address = Address::repeat_byte(0x02);
const RELAYER: Address = Address::repeat_byte(0xee);
const ALICE: Address = Address::repeat_byte(0xa1);
const BOB: Address = Address::repeat_byte(0xb0);

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

struct Deployment<A> {
    vault: Rc<InMemoryVault>,
    adapter: Rc<A>,
    manager: Rc<AssetManager>,
    pool_id: PoolId,
}

impl Deployment<MockAdapter> {
    fn new(deposit: u128) -> Self {
        Self::deploy(deposit, |uow, bank| {
            MockAdapter::new(uow, bank, Address::repeat_byte(0x3c), DAI)
        })
    }
}

impl Deployment<YieldVaultAdapter> {
    /// A vault where `BOB` already holds `seed` shares and `yield_amount`
    /// has accrued, so shares are priced above par.
    fn off_par(deposit: u128, seed: u128, yield_amount: u128) -> Self {
        Self::deploy(deposit, |uow, bank| {
            let vault =
                YieldVaultAdapter::new(uow, Rc::clone(&bank), Address::repeat_byte(0x3d), DAI);
            let Ok(()) = bank.mint(DAI, BOB, Amount::new(seed)) else {
                panic!("mint");
            };
            let Ok(_) = vault.deposit(BOB, Amount::new(seed)) else {
                panic!("seed deposit");
            };
            let Ok(()) = vault.accrue_yield(Amount::new(yield_amount)) else {
                panic!("yield");
            };
            vault
        })
    }

    /// One share's value, rounded up.
    fn share_price_ceil(&self) -> u128 {
        let assets = self.adapter.total_assets().get();
        let supply = self.adapter.total_supply().get();
        assets.div_ceil(supply)
    }
}

impl<A: InvestmentAdapter + 'static> Deployment<A> {
    fn deploy(deposit: u128, make: impl FnOnce(&Rc<UnitOfWork>, Rc<TokenBank>) -> Rc<A>) -> Self {
        let uow = UnitOfWork::new();
        let bank = TokenBank::new(&uow);
        let Ok(()) = bank.mint(DAI, ALICE, Amount::new(deposit)) else {
            panic!("mint");
        };
        let vault = InMemoryVault::new(&uow, VAULT, bank.clone(), SettlementPolicy::None);
        let adapter = make(&uow, Rc::clone(&bank));
        let Ok(manager) = AssetManagerBuilder::new(Address::repeat_byte(0xa0))
            .underlying(DAI)
            .reward_collector(Address::repeat_byte(0xfe))
            .adapter(adapter.clone())
            .ledger(vault.clone())
            .token_ledger(bank)
            .unit_of_work(uow)
            .build()
        else {
            panic!("valid wiring");
        };
        let Ok(pool_id) = vault.register_pool(
            OWNER,
            POOL,
            RELAYER,
            vec![
                TokenRegistration::managed(DAI, manager.clone()),
                TokenRegistration::plain(USDC),
            ],
        ) else {
            panic!("valid pool");
        };
        let Ok(()) = manager.initialize(pool_id) else {
            panic!("initialize");
        };
        vault.set_relayer_approval(&CallContext::new(ALICE), RELAYER, true);
        let Ok(_) = vault.join_pool(
            &CallContext::on_behalf_of(RELAYER, ALICE),
            pool_id,
            ALICE,
            &JoinRequest::new(vec![Amount::new(deposit), Amount::ZERO]),
        ) else {
            panic!("join");
        };
        Self {
            vault,
            adapter,
            manager,
            pool_id,
        }
    }

    fn set_target(&self, target: u64) {
        let Ok(cfg) = InvestmentConfig::new(Fraction::new(target), Fraction::ONE, Fraction::ZERO)
        else {
            panic!("valid config");
        };
        let Ok(()) = self.vault.set_asset_manager_pool_config(
            &CallContext::new(OWNER),
            self.pool_id,
            DAI,
            ConfigBlob::encode(&cfg),
        ) else {
            panic!("config accepted");
        };
    }

    fn balances(&self) -> (Amount, Amount) {
        let Ok(b) = self.manager.get_pool_balances(self.pool_id) else {
            panic!("balances");
        };
        (b.cash(), b.managed())
    }
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Pool deposits in [1, 10^24].
fn deposit_strategy() -> impl Strategy<Value = u128> {
    1u128..=1_000_000_000_000_000_000_000_000u128
}

/// Third-party shares seeded ahead of the pool, in [1, 1000].
fn seed_strategy() -> impl Strategy<Value = u128> {
    1u128..=1_000u128
}

/// Yield accrued on the seeded shares, in [0, 1000].
fn yield_strategy() -> impl Strategy<Value = u128> {
    0u128..=1_000u128
}

/// Targets anywhere in [0, 1e18].
fn target_strategy() -> impl Strategy<Value = u64> {
    0u64..=Fraction::ONE.get()
}

/// Raw thresholds reaching slightly past 100%.
fn threshold_strategy() -> impl Strategy<Value = u64> {
    0u64..=1_100_000_000_000_000_000u64
}

// ---------------------------------------------------------------------------
// Properties 1–3: rebalancing
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_rebalance_conserves_total(
        deposit in deposit_strategy(),
        first in target_strategy(),
        second in target_strategy(),
    ) {
        let d = Deployment::new(deposit);
        d.set_target(first);
        prop_assert!(d.manager.rebalance(d.pool_id, true).is_ok());
        let (cash, managed) = d.balances();
        prop_assert_eq!(cash.get() + managed.get(), deposit);

        d.set_target(second);
        prop_assert!(d.manager.rebalance(d.pool_id, true).is_ok());
        let (cash, managed) = d.balances();
        prop_assert_eq!(cash.get() + managed.get(), deposit);
    }

    #[test]
    fn prop_forced_rebalance_is_idempotent(
        deposit in deposit_strategy(),
        target in target_strategy(),
    ) {
        let d = Deployment::new(deposit);
        d.set_target(target);
        prop_assert!(d.manager.rebalance(d.pool_id, true).is_ok());
        let first = d.balances();
        prop_assert!(d.manager.rebalance(d.pool_id, true).is_ok());
        prop_assert_eq!(d.balances(), first);
    }

    #[test]
    fn prop_rebalance_reaches_target(
        deposit in deposit_strategy(),
        target in target_strategy(),
    ) {
        let d = Deployment::new(deposit);
        d.set_target(target);
        prop_assert!(d.manager.rebalance(d.pool_id, true).is_ok());
        prop_assert_eq!(
            d.manager.max_investable_balance(d.pool_id),
            Ok(SignedAmount::ZERO)
        );

        let halved = target / 2;
        d.set_target(halved);
        let total = Amount::new(deposit);
        let Ok(old) = Fraction::new(target).mul_amount(total, Rounding::Down) else {
            return Ok(());
        };
        let Ok(new) = Fraction::new(halved).mul_amount(total, Rounding::Down) else {
            return Ok(());
        };
        let Ok(expected) = SignedAmount::difference(new, old) else {
            return Ok(());
        };
        let Ok(room) = d.manager.max_investable_balance(d.pool_id) else {
            return Err(TestCaseError::fail("max investable failed"));
        };
        prop_assert!(!room.is_positive());
        prop_assert_eq!(room, expected);
    }
}

// ---------------------------------------------------------------------------
// Properties 1–2 off par
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_off_par_forced_rebalance_is_idempotent(
        deposit in deposit_strategy(),
        seed in seed_strategy(),
        yield_amount in yield_strategy(),
        first in target_strategy(),
        second in target_strategy(),
    ) {
        let d = Deployment::off_par(deposit, seed, yield_amount);
        for target in [first, second] {
            d.set_target(target);
            prop_assert!(d.manager.rebalance(d.pool_id, true).is_ok());
            let settled = d.balances();
            prop_assert!(d.manager.rebalance(d.pool_id, true).is_ok());
            prop_assert_eq!(d.balances(), settled);
            let Ok(room) = d.manager.max_investable_balance(d.pool_id) else {
                return Err(TestCaseError::fail("max investable failed"));
            };
            prop_assert!(!room.is_negative());
        }
    }

    #[test]
    fn prop_off_par_rebalance_conserves_within_rounding(
        deposit in deposit_strategy(),
        seed in seed_strategy(),
        yield_amount in yield_strategy(),
        first in target_strategy(),
        second in target_strategy(),
    ) {
        let d = Deployment::off_par(deposit, seed, yield_amount);
        let mut before = deposit;
        for target in [first, second] {
            d.set_target(target);
            prop_assert!(d.manager.rebalance(d.pool_id, true).is_ok());
            let (cash, managed) = d.balances();
            let after = cash.get() + managed.get();
            let tolerance = 4 * (d.share_price_ceil() + 1);
            prop_assert!(after <= before);
            prop_assert!(before - after <= tolerance);
            before = after;
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: config ordering
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_config_accepted_iff_ordered(
        target in threshold_strategy(),
        upper in threshold_strategy(),
        lower in threshold_strategy(),
    ) {
        let ordered = lower <= target && target <= upper && upper <= Fraction::ONE.get();
        let result = InvestmentConfig::new(
            Fraction::new(target),
            Fraction::new(upper),
            Fraction::new(lower),
        );
        prop_assert_eq!(result.is_ok(), ordered);
        if let Ok(cfg) = result {
            prop_assert_eq!(ConfigBlob::encode(&cfg).decode(), Ok(cfg));
        }
    }
}
