use crate::models::{Product, ProductDemandPoint, SaleQuantity};
use std::collections::{BTreeMap, HashMap};

/// Collapse the sales ledger into one demand point per product.
///
/// Inner-join semantics: products without sales are left out, and so are
/// sales whose product is missing from the catalog. Points come back ordered
/// by product id.
pub fn build_demand_points(products: &[Product], sales: &[SaleQuantity]) -> Vec<ProductDemandPoint> {
    let prices: HashMap<&str, &Product> = products
        .iter()
        .map(|p| (p.product_id.as_str(), p))
        .collect();

    let mut totals: BTreeMap<&str, i64> = BTreeMap::new();
    for sale in sales {
        if prices.contains_key(sale.product_id.as_str()) {
            *totals.entry(sale.product_id.as_str()).or_insert(0) += i64::from(sale.quantity);
        }
    }

    totals
        .into_iter()
        .filter_map(|(product_id, total)| {
            prices
                .get(product_id)
                .map(|product| ProductDemandPoint::new(product_id, product.price, total))
        })
        .collect()
}
