// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Day of month the salary lands, 1-31, clamped per month.
    pub pay_day: u32,
    pub salary: Decimal,
    pub pct_fixed: Decimal,
    pub pct_variable: Decimal,
    pub pct_savings: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub kind: AccountKind,
    pub balance: Decimal,
    pub active: bool,
}

/// A savings goal. Its current amount is not a field: it is always
/// recomputed as the sum of the goal's allocation records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Current,
    Savings,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Current => "current",
            AccountKind::Savings => "savings",
        }
    }

    pub fn parse(s: &str) -> Result<Self, Error> {
        match s {
            "current" => Ok(AccountKind::Current),
            "savings" => Ok(AccountKind::Savings),
            other => Err(Error::InvalidArgument(format!(
                "Unknown account kind '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringCharge {
    pub id: i64,
    pub user_id: i64,
    pub account_id: i64,
    pub name: String,
    pub category: Category,
    /// Always positive; the engine negates it when writing the ledger entry.
    pub amount: Decimal,
    pub day_of_month: u32,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub user_id: i64,
    pub account_id: i64,
    /// Signed: negative is a debit.
    pub amount: Decimal,
    pub category: Category,
    pub description: String,
    pub date: NaiveDate,
    /// Set only on engine-applied recurring charges; with `cycle_label`
    /// it forms the idempotency key.
    pub charge_id: Option<i64>,
    pub cycle_label: Option<String>,
}

/// Derived on every call from the pay day; never persisted or cached so a
/// pay-day change takes effect immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetCycle {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// `YYYY-MM` of the month the cycle starts in.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSnapshot {
    pub id: i64,
    pub user_id: i64,
    pub month: String,
    pub cycle_start: NaiveDate,
    pub cycle_end: NaiveDate,
    pub total_income: Decimal,
    pub total_fixed: Decimal,
    pub total_variable: Decimal,
    pub total_savings: Decimal,
    pub current_balance: Decimal,
    pub salary: Decimal,
    pub budget_fixed: Decimal,
    pub budget_variable: Decimal,
    pub entry_count: i64,
    pub fixed_count: i64,
    pub variable_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Monthly,
    Bimonthly,
    Quarterly,
    Semiannual,
    Annual,
}

impl Frequency {
    /// Cycle-month interval between two due occurrences.
    pub fn interval_months(&self) -> i32 {
        match self {
            Frequency::Monthly => 1,
            Frequency::Bimonthly => 2,
            Frequency::Quarterly => 3,
            Frequency::Semiannual => 6,
            Frequency::Annual => 12,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Monthly => "monthly",
            Frequency::Bimonthly => "bimonthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Semiannual => "semiannual",
            Frequency::Annual => "annual",
        }
    }

    pub fn parse(s: &str) -> Result<Self, Error> {
        match s {
            "monthly" => Ok(Frequency::Monthly),
            "bimonthly" => Ok(Frequency::Bimonthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "semiannual" => Ok(Frequency::Semiannual),
            "annual" => Ok(Frequency::Annual),
            other => Err(Error::InvalidArgument(format!(
                "Unknown frequency '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    // Income
    Salary,
    Bonus,
    Freelance,
    Allowance,
    Refund,
    InvestmentGain,
    GiftReceived,
    Sale,
    // Fixed charges
    Rent,
    Insurance,
    Subscription,
    MortgageLoan,
    ConsumerLoan,
    Taxes,
    HealthInsurance,
    // Variable expenses
    Groceries,
    Restaurant,
    Transport,
    Fuel,
    Shopping,
    Leisure,
    Health,
    Beauty,
    Home,
    Education,
    Travel,
    // Savings and investment
    Savings,
    Investment,
    // Other
    InternalTransfer,
    GoalTransfer,
    CashWithdrawal,
    BankFees,
    Commission,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Salary => "salary",
            Category::Bonus => "bonus",
            Category::Freelance => "freelance",
            Category::Allowance => "allowance",
            Category::Refund => "refund",
            Category::InvestmentGain => "investment_gain",
            Category::GiftReceived => "gift_received",
            Category::Sale => "sale",
            Category::Rent => "rent",
            Category::Insurance => "insurance",
            Category::Subscription => "subscription",
            Category::MortgageLoan => "mortgage_loan",
            Category::ConsumerLoan => "consumer_loan",
            Category::Taxes => "taxes",
            Category::HealthInsurance => "health_insurance",
            Category::Groceries => "groceries",
            Category::Restaurant => "restaurant",
            Category::Transport => "transport",
            Category::Fuel => "fuel",
            Category::Shopping => "shopping",
            Category::Leisure => "leisure",
            Category::Health => "health",
            Category::Beauty => "beauty",
            Category::Home => "home",
            Category::Education => "education",
            Category::Travel => "travel",
            Category::Savings => "savings",
            Category::Investment => "investment",
            Category::InternalTransfer => "internal_transfer",
            Category::GoalTransfer => "goal_transfer",
            Category::CashWithdrawal => "cash_withdrawal",
            Category::BankFees => "bank_fees",
            Category::Commission => "commission",
            Category::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Result<Self, Error> {
        match s {
            "salary" => Ok(Category::Salary),
            "bonus" => Ok(Category::Bonus),
            "freelance" => Ok(Category::Freelance),
            "allowance" => Ok(Category::Allowance),
            "refund" => Ok(Category::Refund),
            "investment_gain" => Ok(Category::InvestmentGain),
            "gift_received" => Ok(Category::GiftReceived),
            "sale" => Ok(Category::Sale),
            "rent" => Ok(Category::Rent),
            "insurance" => Ok(Category::Insurance),
            "subscription" => Ok(Category::Subscription),
            "mortgage_loan" => Ok(Category::MortgageLoan),
            "consumer_loan" => Ok(Category::ConsumerLoan),
            "taxes" => Ok(Category::Taxes),
            "health_insurance" => Ok(Category::HealthInsurance),
            "groceries" => Ok(Category::Groceries),
            "restaurant" => Ok(Category::Restaurant),
            "transport" => Ok(Category::Transport),
            "fuel" => Ok(Category::Fuel),
            "shopping" => Ok(Category::Shopping),
            "leisure" => Ok(Category::Leisure),
            "health" => Ok(Category::Health),
            "beauty" => Ok(Category::Beauty),
            "home" => Ok(Category::Home),
            "education" => Ok(Category::Education),
            "travel" => Ok(Category::Travel),
            "savings" => Ok(Category::Savings),
            "investment" => Ok(Category::Investment),
            "internal_transfer" => Ok(Category::InternalTransfer),
            "goal_transfer" => Ok(Category::GoalTransfer),
            "cash_withdrawal" => Ok(Category::CashWithdrawal),
            "bank_fees" => Ok(Category::BankFees),
            "commission" => Ok(Category::Commission),
            "other" => Ok(Category::Other),
            other => Err(Error::InvalidArgument(format!(
                "Unknown category '{}'",
                other
            ))),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::parse(s)
    }
}

impl std::str::FromStr for Frequency {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Frequency::parse(s)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
