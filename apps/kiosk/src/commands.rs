//! # Kiosk Commands
//!
//! One line of input is one command. Products, parameters and options are
//! addressed by their catalog ids; cart lines by their position (1-based)
//! as shown by `cart`.
//!
//! ## Command Reference
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  menu                                 list products                     │
//! │  toggle <product>                     expand / collapse a product       │
//! │  show <product>                       options, quantity and price       │
//! │  select   <product> <param> <option>  tick an option (one-of: replace)  │
//! │  deselect <product> <param> <option>  untick an option                  │
//! │  tick     <product> <param> <option>  flip an option                    │
//! │  qty <product> <value>                type into the quantity box        │
//! │  inc <product> / dec <product>        quantity "+" / "−"                │
//! │  add <product>                        add the configuration to the cart │
//! │                                                                         │
//! │  cart                                 list lines and totals             │
//! │  line-qty <n> <value>                 type into line n's quantity box   │
//! │  line-inc <n> / line-dec <n>          line n's "+" / "−"                │
//! │  remove <n>                           drop line n                       │
//! │                                                                         │
//! │  order <phone> <address...>           print the order JSON, empty cart  │
//! │  help / quit                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt::Write as _;
use std::str::FromStr;

use bistro_core::catalog::ParameterKind;
use bistro_core::quantity::QuantityRejection;
use bistro_core::{
    CartEvent, DeliveryContact, LineId, Money, OptionId, OrderPayload, ParamId,
    ProductConfigurator, ProductId, QuantityOutcome, Storefront,
};
use bistro_core::events::Subscription;
use tracing::debug;

use crate::config::KioskConfig;
use crate::error::{KioskError, KioskResult};

// =============================================================================
// Command
// =============================================================================

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Menu,
    Toggle(ProductId),
    Show(ProductId),
    Select(OptionRef),
    Deselect(OptionRef),
    Tick(OptionRef),
    Quantity { product: ProductId, raw: String },
    Increment(ProductId),
    Decrement(ProductId),
    Add(ProductId),
    Cart,
    LineQuantity { line: usize, raw: String },
    LineIncrement(usize),
    LineDecrement(usize),
    Remove(usize),
    Order { phone: String, address: String },
    Quit,
}

/// `<product> <param> <option>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRef {
    pub product: ProductId,
    pub param: ParamId,
    pub option: OptionId,
}

impl FromStr for Command {
    type Err = KioskError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = words.collect();

        let command = match (verb.as_str(), args.as_slice()) {
            ("help" | "?", []) => Command::Help,
            ("menu", []) => Command::Menu,
            ("toggle", [product]) => Command::Toggle(ProductId::from(*product)),
            ("show", [product]) => Command::Show(ProductId::from(*product)),
            ("select", [p, a, o]) => Command::Select(OptionRef::new(p, a, o)),
            ("deselect", [p, a, o]) => Command::Deselect(OptionRef::new(p, a, o)),
            ("tick", [p, a, o]) => Command::Tick(OptionRef::new(p, a, o)),
            ("qty", [product, raw @ ..]) if !raw.is_empty() => Command::Quantity {
                product: ProductId::from(*product),
                raw: raw.join(" "),
            },
            ("inc", [product]) => Command::Increment(ProductId::from(*product)),
            ("dec", [product]) => Command::Decrement(ProductId::from(*product)),
            ("add", [product]) => Command::Add(ProductId::from(*product)),
            ("cart", []) => Command::Cart,
            ("line-qty", [line, raw @ ..]) if !raw.is_empty() => Command::LineQuantity {
                line: parse_position(line, "line-qty <n> <value>")?,
                raw: raw.join(" "),
            },
            ("line-inc", [line]) => Command::LineIncrement(parse_position(line, "line-inc <n>")?),
            ("line-dec", [line]) => Command::LineDecrement(parse_position(line, "line-dec <n>")?),
            ("remove", [line]) => Command::Remove(parse_position(line, "remove <n>")?),
            ("order", [phone, address @ ..]) => Command::Order {
                phone: phone.to_string(),
                address: address.join(" "),
            },
            ("quit" | "exit", []) => Command::Quit,
            (verb, _) => return Err(usage_for(verb)),
        };

        Ok(command)
    }
}

impl OptionRef {
    fn new(product: &str, param: &str, option: &str) -> Self {
        OptionRef {
            product: ProductId::from(product),
            param: ParamId::from(param),
            option: OptionId::from(option),
        }
    }
}

fn parse_position(raw: &str, usage: &'static str) -> KioskResult<usize> {
    raw.parse::<usize>().map_err(|_| KioskError::Usage(usage))
}

/// Picks the usage line for a known verb with wrong arguments.
fn usage_for(verb: &str) -> KioskError {
    let usage = match verb {
        "help" | "?" => "help",
        "menu" => "menu",
        "toggle" => "toggle <product>",
        "show" => "show <product>",
        "select" => "select <product> <param> <option>",
        "deselect" => "deselect <product> <param> <option>",
        "tick" => "tick <product> <param> <option>",
        "qty" => "qty <product> <value>",
        "inc" => "inc <product>",
        "dec" => "dec <product>",
        "add" => "add <product>",
        "cart" => "cart",
        "line-qty" => "line-qty <n> <value>",
        "line-inc" => "line-inc <n>",
        "line-dec" => "line-dec <n>",
        "remove" => "remove <n>",
        "order" => "order <phone> <address...>",
        "quit" | "exit" => "quit",
        other => return KioskError::UnknownCommand(other.to_string()),
    };
    KioskError::Usage(usage)
}

// =============================================================================
// Reply
// =============================================================================

/// What the session answers to one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Human-readable lines.
    Text(String),

    /// A submitted order, written to stdout as one JSON line.
    Order(OrderPayload),

    Quit,
}

// =============================================================================
// Session
// =============================================================================

/// One kiosk session: a storefront plus the settings used to display it.
pub struct Session {
    storefront: Storefront,
    config: KioskConfig,
    cart_events: Subscription<CartEvent>,
}

impl Session {
    pub fn new(mut storefront: Storefront, config: KioskConfig) -> Self {
        let cart_events = storefront.cart_mut().subscribe();
        Session {
            storefront,
            config,
            cart_events,
        }
    }

    pub fn storefront(&self) -> &Storefront {
        &self.storefront
    }

    /// Runs one command against the storefront.
    pub fn execute(&mut self, command: Command) -> KioskResult<Reply> {
        debug!(?command, "Executing command");

        let text = match command {
            Command::Quit => return Ok(Reply::Quit),
            Command::Order { phone, address } => {
                let payload = self
                    .storefront
                    .submit_order(&DeliveryContact::new(address, phone))?;
                self.cart_events.drain();
                return Ok(Reply::Order(payload));
            }

            Command::Help => HELP.to_string(),
            Command::Menu => self.render_menu(),
            Command::Toggle(product) => {
                let transition = self.storefront.toggle(&product)?;
                match transition.expanded {
                    Some(expanded) => self.render_product(self.configurator(&expanded)?),
                    None => format!("{product} collapsed"),
                }
            }
            Command::Show(product) => self.render_product(self.configurator(&product)?),

            Command::Select(r) => {
                let price = self.choose(&r)?;
                format!("price: {}", self.money(price))
            }
            Command::Deselect(r) => {
                let price = self.configurator_mut(&r.product)?.deselect_option(&r.param, &r.option)?;
                format!("price: {}", self.money(price))
            }
            Command::Tick(r) => {
                let price = self.configurator_mut(&r.product)?.toggle_option(&r.param, &r.option)?;
                format!("price: {}", self.money(price))
            }

            Command::Quantity { product, raw } => {
                let outcome = self.configurator_mut(&product)?.set_quantity_input(&raw);
                self.render_product_quantity(&product, outcome)?
            }
            Command::Increment(product) => {
                let outcome = self.configurator_mut(&product)?.increment();
                self.render_product_quantity(&product, outcome)?
            }
            Command::Decrement(product) => {
                let outcome = self.configurator_mut(&product)?.decrement();
                self.render_product_quantity(&product, outcome)?
            }

            Command::Add(product) => {
                let id = self.storefront.add_to_cart(&product)?;
                let cart = self.storefront.cart();
                let position = cart.lines().len();
                match cart.line(id) {
                    Some(line) => format!(
                        "added #{position}: {} x{} {}",
                        line.name(),
                        line.amount(),
                        self.money(line.price())
                    ),
                    None => format!("added #{position}"),
                }
            }

            Command::Cart => self.render_cart(),
            Command::LineQuantity { line, raw } => {
                let id = self.line_id(line)?;
                let outcome = self.storefront.cart_mut().set_line_quantity_input(id, &raw)?;
                self.render_line_quantity(line, id, outcome)
            }
            Command::LineIncrement(line) => {
                let id = self.line_id(line)?;
                let outcome = self.storefront.cart_mut().increment_line(id)?;
                self.render_line_quantity(line, id, outcome)
            }
            Command::LineDecrement(line) => {
                let id = self.line_id(line)?;
                let outcome = self.storefront.cart_mut().decrement_line(id)?;
                self.render_line_quantity(line, id, outcome)
            }
            Command::Remove(line) => {
                let id = self.line_id(line)?;
                let removed = self.storefront.cart_mut().remove(id)?;
                format!("removed #{line}: {}", removed.name())
            }
        };

        Ok(Reply::Text(self.with_cart_status(text)))
    }

    /// Ticks an option. On a `radios` or `select` parameter the other
    /// options of that parameter are unticked in the same step.
    fn choose(&mut self, r: &OptionRef) -> KioskResult<Money> {
        let configurator = self.configurator_mut(&r.product)?;
        let one_of = configurator
            .definition()
            .parameter(&r.param)
            .is_some_and(|param| param.kind != ParameterKind::Checkboxes);

        if !one_of {
            return Ok(configurator.select_option(&r.param, &r.option)?);
        }

        let mut selection = configurator.selection().clone();
        let others: Vec<OptionId> = selection
            .selected(&r.param)
            .filter(|option| **option != r.option)
            .cloned()
            .collect();
        for option in &others {
            selection.deselect(&r.param, option);
        }
        selection.select(r.param.clone(), r.option.clone());

        Ok(configurator.apply_selection(selection)?)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    fn configurator(&self, product: &ProductId) -> KioskResult<&ProductConfigurator> {
        self.storefront
            .menu()
            .configurator(product)
            .ok_or_else(|| bistro_core::CoreError::ProductNotFound(product.clone()).into())
    }

    fn configurator_mut(&mut self, product: &ProductId) -> KioskResult<&mut ProductConfigurator> {
        Ok(self.storefront.menu_mut().configurator_mut(product)?)
    }

    fn line_id(&self, position: usize) -> KioskResult<LineId> {
        position
            .checked_sub(1)
            .and_then(|index| self.storefront.cart().lines().get(index))
            .map(|line| line.id())
            .ok_or(KioskError::NoSuchLine(position))
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    fn money(&self, amount: Money) -> String {
        self.config.format_currency(amount)
    }

    /// Appends a cart status line when the totals moved.
    fn with_cart_status(&self, mut text: String) -> String {
        let moved = self
            .cart_events
            .drain()
            .into_iter()
            .any(|event| matches!(event, CartEvent::TotalsUpdated(_)));

        if moved {
            let totals = self.storefront.cart().totals();
            let _ = write!(
                text,
                "\ncart: {} item(s), total {}",
                totals.item_count,
                self.money(totals.total)
            );
        }
        text
    }

    fn render_menu(&self) -> String {
        let mut out = format!("{}\n", self.config.store.name);
        for configurator in self.storefront.menu().configurators() {
            let marker = if configurator.is_expanded() { "-" } else { "+" };
            let definition = configurator.definition();
            let _ = writeln!(
                out,
                "[{marker}] {:<12} {:<32} {}",
                definition.id,
                definition.name,
                self.money(configurator.price())
            );
        }
        out.trim_end().to_string()
    }

    fn render_product(&self, configurator: &ProductConfigurator) -> String {
        let definition = configurator.definition();
        let mut out = format!("{} ({})\n", definition.name, definition.id);

        if let Some(description) = &definition.description {
            let _ = writeln!(out, "  {description}");
        }

        for (param_id, param) in &definition.params {
            let hint = match param.kind {
                ParameterKind::Checkboxes => "pick any",
                ParameterKind::Radios | ParameterKind::Select => "pick one",
            };
            let _ = writeln!(out, "  {} [{param_id}] ({hint})", param.label);

            for (option_id, option) in &param.options {
                let tick = if configurator.selection().is_selected(param_id, option_id) {
                    "x"
                } else {
                    " "
                };
                let _ = writeln!(
                    out,
                    "    [{tick}] {:<10} {:<20} {}",
                    option_id,
                    option.label,
                    self.money(option.price)
                );
            }
        }

        let _ = write!(
            out,
            "  quantity: {}  price: {}",
            configurator.quantity().display(),
            self.money(configurator.price())
        );
        out
    }

    fn render_product_quantity(
        &self,
        product: &ProductId,
        outcome: QuantityOutcome,
    ) -> KioskResult<String> {
        let configurator = self.configurator(product)?;
        let status = describe_outcome(outcome, configurator.quantity().value());
        Ok(format!(
            "{status}  price: {}",
            self.money(configurator.price())
        ))
    }

    fn render_line_quantity(&self, position: usize, id: LineId, outcome: QuantityOutcome) -> String {
        match self.storefront.cart().line(id) {
            Some(line) => format!(
                "#{position} {}  price: {}",
                describe_outcome(outcome, line.amount()),
                self.money(line.price())
            ),
            None => format!("#{position} gone"),
        }
    }

    fn render_cart(&self) -> String {
        let cart = self.storefront.cart();
        if cart.is_empty() {
            return "cart is empty".to_string();
        }

        let mut out = String::new();
        for (index, line) in cart.lines().iter().enumerate() {
            let choices: Vec<String> = line
                .params()
                .values()
                .filter(|param| !param.options.is_empty())
                .map(|param| {
                    let labels: Vec<&str> = param.options.values().map(String::as_str).collect();
                    format!("{}: {}", param.label, labels.join(", "))
                })
                .collect();

            let _ = writeln!(
                out,
                "#{:<2} {:<32} x{} {:>10}",
                index + 1,
                line.name(),
                line.amount(),
                self.money(line.price())
            );
            if !choices.is_empty() {
                let _ = writeln!(out, "     {}", choices.join("; "));
            }
        }

        let totals = cart.totals();
        let _ = writeln!(out, "subtotal  {}", self.money(totals.subtotal));
        let _ = writeln!(out, "delivery  {}", self.money(totals.delivery_fee));
        let _ = write!(out, "total     {} ({} item(s))", self.money(totals.total), totals.item_count);
        out
    }
}

fn describe_outcome(outcome: QuantityOutcome, current: i64) -> String {
    match outcome {
        QuantityOutcome::Updated(update) => format!("quantity: {}", update.current),
        QuantityOutcome::Unchanged => format!("quantity unchanged: {current}"),
        QuantityOutcome::Rejected(QuantityRejection::NotNumeric) => {
            format!("not a number, quantity stays {current}")
        }
        QuantityOutcome::Rejected(QuantityRejection::OutOfRange { min, max, .. }) => {
            format!("quantity must be {min}..{max}, stays {current}")
        }
    }
}

const HELP: &str = "\
menu | toggle <product> | show <product>
select|deselect|tick <product> <param> <option>
qty <product> <value> | inc <product> | dec <product> | add <product>
cart | line-qty <n> <value> | line-inc <n> | line-dec <n> | remove <n>
order <phone> <address...> | quit";

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_core::{Catalog, EngineConfig, Money};

    const CATALOG: &str = r#"[
        {
            "id": "pizza",
            "name": "Nonna Alba's Pizza",
            "price": 2000,
            "params": {
                "sauce": {
                    "label": "Sauce",
                    "type": "radios",
                    "options": {
                        "tomato": { "label": "Tomato", "price": 600, "default": true },
                        "cream": { "label": "Sour cream", "price": 500 }
                    }
                }
            }
        },
        { "id": "salad", "name": "Nonno Alberto's Salad", "price": 900 }
    ]"#;

    fn session() -> Session {
        let catalog: Catalog = serde_json::from_str(CATALOG).unwrap();
        let storefront = Storefront::from_catalog(&catalog, EngineConfig::default()).unwrap();
        Session::new(storefront, KioskConfig::default())
    }

    fn run(session: &mut Session, line: &str) -> Reply {
        session.execute(line.parse().unwrap()).unwrap()
    }

    fn text(reply: Reply) -> String {
        match reply {
            Reply::Text(text) => text,
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("menu".parse::<Command>().unwrap(), Command::Menu);
        assert_eq!(
            "SELECT pizza sauce cream".parse::<Command>().unwrap(),
            Command::Select(OptionRef::new("pizza", "sauce", "cream"))
        );
        assert_eq!(
            "qty pizza 4 pizzas".parse::<Command>().unwrap(),
            Command::Quantity {
                product: ProductId::from("pizza"),
                raw: "4 pizzas".to_string()
            }
        );
        assert_eq!(
            "order 555-0100 Main Street 1".parse::<Command>().unwrap(),
            Command::Order {
                phone: "555-0100".to_string(),
                address: "Main Street 1".to_string()
            }
        );
        assert_eq!("remove 2".parse::<Command>().unwrap(), Command::Remove(2));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "fly pizza".parse::<Command>(),
            Err(KioskError::UnknownCommand(verb)) if verb == "fly"
        ));
        assert!(matches!(
            "add".parse::<Command>(),
            Err(KioskError::Usage("add <product>"))
        ));
        assert!(matches!(
            "remove first".parse::<Command>(),
            Err(KioskError::Usage("remove <n>"))
        ));
    }

    #[test]
    fn test_configure_and_add() {
        let mut session = session();

        let shown = text(run(&mut session, "toggle pizza"));
        assert!(shown.contains("[x] tomato"));
        assert!(shown.contains("price: $20.00"));

        let priced = text(run(&mut session, "tick pizza sauce cream"));
        assert_eq!(priced, "price: $25.00");
        let priced = text(run(&mut session, "deselect pizza sauce tomato"));
        assert_eq!(priced, "price: $19.00");

        let added = text(run(&mut session, "add pizza"));
        assert!(added.starts_with("added #1: Nonna Alba's Pizza x1 $19.00"));
        assert!(added.ends_with("cart: 1 item(s), total $39.00"));
    }

    #[test]
    fn test_select_replaces_one_of_choice() {
        let mut session = session();

        assert_eq!(text(run(&mut session, "select pizza sauce cream")), "price: $19.00");
        let shown = text(run(&mut session, "show pizza"));
        assert!(shown.contains("[x] cream"));
        assert!(shown.contains("[ ] tomato"));

        // Unknown options still fail and leave the choice alone.
        assert!(session
            .execute("select pizza sauce pesto".parse().unwrap())
            .is_err());
        assert_eq!(text(run(&mut session, "select pizza sauce tomato")), "price: $20.00");
    }

    #[test]
    fn test_select_adds_to_checkboxes() {
        let catalog: Catalog = serde_json::from_str(
            r#"[{ "id": "salad", "name": "Salad", "price": 900, "params": {
                "extras": { "label": "Extras", "options": {
                    "feta": { "label": "Feta", "price": 200 },
                    "croutons": { "label": "Croutons", "price": 100 } } } } }]"#,
        )
        .unwrap();
        let storefront = Storefront::from_catalog(&catalog, EngineConfig::default()).unwrap();
        let mut session = Session::new(storefront, KioskConfig::default());

        run(&mut session, "select salad extras feta");
        assert_eq!(text(run(&mut session, "select salad extras croutons")), "price: $12.00");
    }

    #[test]
    fn test_quantity_feedback() {
        let mut session = session();

        assert_eq!(text(run(&mut session, "qty salad 3")), "quantity: 3  price: $27.00");
        assert_eq!(
            text(run(&mut session, "qty salad 12")),
            "quantity must be 1..9, stays 3  price: $27.00"
        );
        assert_eq!(
            text(run(&mut session, "qty salad abc")),
            "not a number, quantity stays 3  price: $27.00"
        );
        assert_eq!(
            text(run(&mut session, "qty salad 3")),
            "quantity unchanged: 3  price: $27.00"
        );
    }

    #[test]
    fn test_cart_lines_and_order() {
        let mut session = session();
        run(&mut session, "add salad");
        run(&mut session, "add pizza");

        let changed = text(run(&mut session, "line-qty 1 2"));
        assert!(changed.starts_with("#1 quantity: 2  price: $18.00"));

        let cart = text(run(&mut session, "cart"));
        assert!(cart.contains("Sauce: Tomato"));
        assert!(cart.contains("total     $58.00 (3 item(s))"));

        let reply = run(&mut session, "order 555-0100 Main Street 1");
        let Reply::Order(payload) = reply else {
            panic!("expected an order");
        };
        assert_eq!(payload.address, "Main Street 1");
        assert_eq!(payload.total_price, Money::from_major(58));
        assert_eq!(payload.products.len(), 2);
        assert!(session.storefront().cart().is_empty());
    }

    #[test]
    fn test_line_errors() {
        let mut session = session();
        run(&mut session, "add salad");

        let err = session.execute("remove 2".parse().unwrap()).unwrap_err();
        assert!(matches!(err, KioskError::NoSuchLine(2)));
        let err = session.execute("line-inc 0".parse().unwrap()).unwrap_err();
        assert!(matches!(err, KioskError::NoSuchLine(0)));

        let removed = text(run(&mut session, "remove 1"));
        assert!(removed.starts_with("removed #1"));
        assert!(removed.ends_with("cart: 0 item(s), total $0.00"));
    }

    #[test]
    fn test_order_needs_address() {
        let mut session = session();
        run(&mut session, "add salad");

        let err = session.execute("order 555-0100".parse().unwrap()).unwrap_err();
        assert!(matches!(err, KioskError::Core(bistro_core::CoreError::Validation(_))));
        assert_eq!(session.storefront().cart().len(), 1);
    }

    #[test]
    fn test_unknown_product() {
        let mut session = session();
        let err = session.execute("add cake".parse().unwrap()).unwrap_err();
        assert_eq!(err.to_string(), "Product not found: cake");
    }
}
