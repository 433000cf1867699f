//! Builtin item classes shipped with the hub.
//!
//! These are deliberately simple: a lamp, a thermometer fed from events, and
//! a scene grouping other items. Real device drivers live outside this crate
//! and plug in through the same factory.

use std::any::Any;

use tracing::info;

use nethome_core::event::{attributes, HomeEvent};
use nethome_core::value::Value;
use nethome_model::{CapabilityTable, HomeItem, ItemError};

use crate::factory::ItemFactory;

/// Factory preloaded with all builtin classes.
pub fn standard_factory() -> ItemFactory {
    let mut factory = ItemFactory::new();
    factory.register("Lamp", || Box::<Lamp>::default());
    factory.register("Thermometer", || Box::<Thermometer>::default());
    factory.register("Scene", || Box::<Scene>::default());
    factory
}

/// A switchable lamp.
#[derive(Default)]
pub struct Lamp {
    state: bool,
    room: String,
}

const LAMP_MODEL: &str = r#"
<HomeItem Class="Lamp" Category="Lamps">
  <Attribute Name="State" Type="Boolean" Get="getState" Set="setState" Default="true"/>
  <Attribute Name="Room" Type="String" Get="getRoom" Init="initRoom"/>
  <Action Name="On" Method="on"/>
  <Action Name="Off" Method="off"/>
  <Action Name="Toggle" Method="toggle" Default="true"/>
</HomeItem>"#;

impl Lamp {
    pub fn is_on(&self) -> bool {
        self.state
    }
}

impl HomeItem for Lamp {
    fn model_xml(&self) -> &str {
        LAMP_MODEL
    }

    fn capabilities(&self) -> CapabilityTable {
        let mut table = CapabilityTable::new();
        table
            .getter::<Lamp>("getState", |lamp| Value::Boolean(lamp.state))
            .setter::<Lamp>("setState", |lamp, value| {
                lamp.state = value
                    .as_bool()
                    .ok_or_else(|| ItemError::illegal_value("State", value.marshal()))?;
                Ok(())
            })
            .getter::<Lamp>("getRoom", |lamp| Value::Text(lamp.room.clone()))
            .initializer::<Lamp>("initRoom", |lamp, value| {
                lamp.room = value.marshal();
                Ok(())
            })
            .action::<Lamp>("on", |lamp| {
                lamp.state = true;
                Ok(String::new())
            })
            .action::<Lamp>("off", |lamp| {
                lamp.state = false;
                Ok(String::new())
            })
            .action::<Lamp>("toggle", |lamp| {
                lamp.state = !lamp.state;
                Ok(if lamp.state { "On" } else { "Off" }.to_string())
            });
        table
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A thermometer fed by `TemperatureEvent`s from the bus.
#[derive(Default)]
pub struct Thermometer {
    temperature: i64,
    updates: u64,
}

const THERMOMETER_MODEL: &str = r#"
<HomeItem Class="Thermometer" Category="Thermometers">
  <Attribute Name="Temperature" Type="Integer" Get="getTemperature" Default="true"/>
  <Attribute Name="Updates" Type="Integer" Get="getUpdates"/>
</HomeItem>"#;

/// Event type consumed by [`Thermometer`].
pub const TEMPERATURE_EVENT: &str = "TemperatureEvent";

impl HomeItem for Thermometer {
    fn model_xml(&self) -> &str {
        THERMOMETER_MODEL
    }

    fn capabilities(&self) -> CapabilityTable {
        let mut table = CapabilityTable::new();
        table
            .getter::<Thermometer>("getTemperature", |t| Value::Integer(t.temperature))
            .getter::<Thermometer>("getUpdates", |t| Value::Integer(t.updates as i64));
        table
    }

    fn receive_event(&mut self, event: &HomeEvent) -> bool {
        if event.event_type() != TEMPERATURE_EVENT {
            return false;
        }
        let Some(reading) = event.attribute(attributes::VALUE).and_then(Value::as_i64) else {
            return false;
        };
        self.temperature = reading;
        self.updates += 1;
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A named group of items, referenced through an `Items`-typed attribute.
#[derive(Default)]
pub struct Scene {
    members: Vec<String>,
    applied: u64,
}

const SCENE_MODEL: &str = r#"
<HomeItem Class="Scene" Category="Controls">
  <Attribute Name="Members" Type="Items" Get="getMembers" Set="setMembers" Default="true"/>
  <Action Name="Apply" Method="apply"/>
</HomeItem>"#;

impl HomeItem for Scene {
    fn model_xml(&self) -> &str {
        SCENE_MODEL
    }

    fn capabilities(&self) -> CapabilityTable {
        let mut table = CapabilityTable::new();
        table
            .getter::<Scene>("getMembers", |scene| Value::List(scene.members.clone()))
            .setter::<Scene>("setMembers", |scene, value| {
                scene.members = value
                    .as_list()
                    .map(<[String]>::to_vec)
                    .unwrap_or_else(|| vec![value.marshal()]);
                Ok(())
            })
            .action::<Scene>("apply", |scene| {
                scene.applied += 1;
                info!(members = ?scene.members, "scene applied");
                Ok(String::new())
            });
        table
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
