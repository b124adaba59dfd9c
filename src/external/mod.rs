pub mod provider;
pub mod router;

pub use provider::{DataProvider, FundamentalsRequest, ProviderError, QuoteRequest};
pub use router::{
    route_fundamentals, route_quote, select_providers, RoutedFundamentals, RoutedQuote,
};
