//! Menu lateral do painel

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub title: &'static str,
    pub path: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Menu {
    pub brand: &'static str,
    pub tagline: &'static str,
    pub group: &'static str,
    pub items: &'static [MenuItem],
    pub footer_action: &'static str,
}

pub const MENU_ITEMS: &[MenuItem] = &[
    MenuItem {
        title: "Dashboard",
        path: "/dashboard",
        icon: "layout-dashboard",
    },
    MenuItem {
        title: "Agendamentos",
        path: "/agendamentos",
        icon: "calendar",
    },
    MenuItem {
        title: "Psicólogos",
        path: "/psicologos",
        icon: "user-cog",
    },
    MenuItem {
        title: "Pacientes",
        path: "/pacientes",
        icon: "users",
    },
];

pub fn menu() -> Menu {
    Menu {
        brand: "MindCare",
        tagline: "Sistema de Gestão",
        group: "Menu Principal",
        items: MENU_ITEMS,
        footer_action: "Sair",
    }
}
