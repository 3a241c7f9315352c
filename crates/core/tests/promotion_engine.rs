//! Integration tests for eligibility, pricing and lifecycle rules.

use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;
use rusty_money::{Money, iso::VND};
use testresult::TestResult;
use uuid::Uuid;

use rebate::prelude::*;

fn promotion(
    discount: SimpleDiscount<'static>,
    max_discount: Option<i64>,
    targets: PromotionTargets,
) -> TestResult<Promotion<'static>> {
    let start = Timestamp::UNIX_EPOCH;

    Ok(Promotion {
        uuid: Uuid::now_v7(),
        discount,
        max_discount: max_discount.map(|cap| Money::from_minor(cap, VND)),
        window: ValidityWindow::new(start, start + SignedDuration::from_hours(24 * 7))?,
        targets,
        status: PromotionStatus::Active,
        budget: UsageBudget::unlimited(),
    })
}

#[test]
fn twenty_percent_off_one_hundred_thousand() -> TestResult {
    let candidates = [promotion(
        SimpleDiscount::percentage_off(Decimal::from(20))?,
        None,
        PromotionTargets::default(),
    )?];

    let best = best_discount(Money::from_minor(100_000, VND), &candidates)?
        .ok_or("expected a discount")?;

    assert_eq!(best.final_price, Money::from_minor(80_000, VND));

    Ok(())
}

#[test]
fn fixed_amount_is_capped_by_max_discount() -> TestResult {
    let candidates = [promotion(
        SimpleDiscount::AmountOff(Money::from_minor(30_000, VND)),
        Some(10_000),
        PromotionTargets::default(),
    )?];

    let best = best_discount(Money::from_minor(100_000, VND), &candidates)?
        .ok_or("expected a discount")?;

    assert_eq!(best.final_price, Money::from_minor(90_000, VND));

    Ok(())
}

#[test]
fn best_discount_stays_within_zero_and_original_price() -> TestResult {
    let discounts = [
        SimpleDiscount::percentage_off(Decimal::ZERO)?,
        SimpleDiscount::percentage_off(Decimal::new(125, 1))?,
        SimpleDiscount::percentage_off(Decimal::ONE_HUNDRED)?,
        SimpleDiscount::AmountOff(Money::from_minor(0, VND)),
        SimpleDiscount::AmountOff(Money::from_minor(999, VND)),
        SimpleDiscount::AmountOff(Money::from_minor(10_000_000, VND)),
    ];

    for discount in discounts {
        for cap in [None, Some(0), Some(1), Some(5_000)] {
            for price in [0_i64, 1, 999, 1_001, 250_000] {
                let candidates = [promotion(discount, cap, PromotionTargets::default())?];

                if let Some(best) = best_discount(Money::from_minor(price, VND), &candidates)? {
                    let final_minor = best.final_price.to_minor_units();

                    assert!(final_minor >= 0, "final price {final_minor} is negative");
                    assert!(
                        final_minor < price,
                        "final price {final_minor} does not improve on {price}"
                    );
                }
            }
        }
    }

    Ok(())
}

#[test]
fn category_targeting_flows_into_pricing() -> TestResult {
    let category = Uuid::now_v7();
    let product = Uuid::now_v7();

    let promotions = [
        promotion(
            SimpleDiscount::percentage_off(Decimal::from(10))?,
            None,
            PromotionTargets::categories([category]),
        )?,
        promotion(
            SimpleDiscount::percentage_off(Decimal::from(50))?,
            None,
            PromotionTargets::products([Uuid::now_v7()]),
        )?,
    ];

    let now = Timestamp::UNIX_EPOCH + SignedDuration::from_hours(1);
    let applicable = find_applicable(&promotions, product, Some(category), now);
    let best = best_discount(Money::from_minor(50_000, VND), applicable)?
        .ok_or("expected the category promotion to apply")?;

    assert_eq!(best.final_price.to_minor_units(), 45_000);

    let after_end = Timestamp::UNIX_EPOCH + SignedDuration::from_hours(24 * 8);

    assert!(find_applicable(&promotions, product, Some(category), after_end).is_empty());

    Ok(())
}

#[test]
fn sweep_is_idempotent_for_a_fixed_instant() -> TestResult {
    let mut promotions = vec![
        promotion(
            SimpleDiscount::percentage_off(Decimal::from(10))?,
            None,
            PromotionTargets::default(),
        )?,
        promotion(
            SimpleDiscount::percentage_off(Decimal::from(10))?,
            None,
            PromotionTargets::default(),
        )?,
    ];

    if let Some(limited) = promotions.get_mut(1) {
        limited.budget = UsageBudget::with_limit(2).used(2);
    }

    let as_of = Timestamp::UNIX_EPOCH + SignedDuration::from_hours(2);

    let mut changed = 0;

    for promotion in &mut promotions {
        if let Some(status) = promotion.sweep_transition(as_of) {
            promotion.status = status;
            changed += 1;
        }
    }

    assert_eq!(changed, 1);

    let second_pass = promotions
        .iter()
        .filter_map(|promotion| promotion.sweep_transition(as_of))
        .count();

    assert_eq!(second_pass, 0);

    Ok(())
}

#[test]
fn slug_is_derived_from_name() {
    assert_eq!(slugify("Summer Sale"), "summer-sale");
    assert_eq!(slugify("Summer Sale"), slugify("summer   sale"));
}
