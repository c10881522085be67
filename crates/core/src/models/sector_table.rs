//! Built-in NSE symbol → sector table and symbol aliases.
//!
//! This is plain data. [`SectorTable`](crate::services::classifier_service::SectorTable)
//! loads it by default and accepts overrides, so the table can be replaced
//! without touching the classifier.

use super::classification::Sector;

/// Symbols grouped by sector.
pub const SECTOR_SYMBOLS: &[(Sector, &[&str])] = &[
    (
        Sector::Banking,
        &[
            "HDFCBANK", "ICICIBANK", "SBIN", "KOTAKBANK", "AXISBANK", "INDUSINDBK",
            "BANKBARODA", "PNB", "IDFCFIRSTB", "FEDERALBNK", "BANDHANBNK", "AUBANK", "RBLBANK",
            "CANBK", "UNIONBANK", "INDIANB", "IOB", "CENTRALBK", "UCOBANK", "BANKINDIA",
            "MAHABANK", "PSB", "J_KBANK", "KARURVYSYA", "TMBANK", "DCBBANK", "SOUTHBANK", "CUB",
            "EQUITASBNK", "UJJIVANSFB", "ESAFSFB",
        ],
    ),
    (
        Sector::It,
        &[
            "TCS", "INFY", "WIPRO", "HCLTECH", "TECHM", "LTIM", "PERSISTENT", "COFORGE",
            "MPHASIS", "LTTS", "MINDTREE", "BIRLASOFT", "NIITLTD", "NIIT", "HAPPSTMNDS",
            "MASTEK", "ZENSARTECH", "CYIENT", "SONATSOFTW", "TATAELXSI", "KPITTECH", "ECLERX",
            "QUICKHEAL", "NEWGEN", "TANLA", "ROUTE", "INTELLECT", "OFSS", "FIRSTSOUR",
            "DATAPATTNS",
        ],
    ),
    (
        Sector::Pharma,
        &[
            "SUNPHARMA", "DRREDDY", "CIPLA", "DIVISLAB", "APOLLOHOSP", "BIOCON", "LUPIN",
            "AUROPHARMA", "TORNTPHARM", "ALKEM", "GLENMARK", "ZYDUSLIFE", "IPCALAB",
            "LAURUSLABS", "ABBOTINDIA", "PFIZER", "SANOFI", "GLAXO", "NATCOPHARMA", "GRANULES",
            "AJANTPHARM", "FORTIS", "MAXHEALTH", "MEDANTA", "RAINBOW", "METROPOLIS",
            "LALPATHLAB", "THYROCARE", "GLAND", "SOLARA",
        ],
    ),
    (
        Sector::Fmcg,
        &[
            "HINDUNILVR", "ITC", "NESTLEIND", "BRITANNIA", "DABUR", "MARICO", "GODREJCP",
            "COLPAL", "TATACONSUM", "VBL", "PGHH", "EMAMILTD", "MCDOWELL_N", "UBL", "RADICO",
            "GLOBUSSPR", "BIKAJI", "DMART", "TRENT", "SHOPERSTOP", "VMART", "ZOMATO", "DEVYANI",
            "JUBLFOOD", "WESTLIFE", "SAPPHIRE", "PATANJALI", "HONAUT",
        ],
    ),
    (
        Sector::Auto,
        &[
            "MARUTI", "TATAMOTORS", "M_M", "BAJAJ_AUTO", "HEROMOTOCO", "EICHERMOT", "ASHOKLEY",
            "TVSMOTOR", "BHARATFORG", "MOTHERSON", "BOSCHLTD", "MRF", "APOLLOTYRE",
            "BALKRISIND", "CEAT", "EXIDEIND", "AMARAJABAT", "SONACOMS", "SAMVARDHAN",
            "SUNDRMFAST", "ESCORTS", "FORCEMOT", "OLECTRA", "JBMA", "ENDURANCE", "SUPRAJIT",
            "UNOMINDA", "SCHAEFFLER", "SKFINDIA", "TIMKEN",
        ],
    ),
    (
        Sector::Metals,
        &[
            "TATASTEEL", "JSWSTEEL", "HINDALCO", "VEDL", "COALINDIA", "NMDC", "SAIL",
            "JINDALSTEL", "NATIONALUM", "HINDZINC", "APLAPOLLO", "RATNAMANI", "WELCORP",
            "TINPLATE", "MOIL", "GMRINFRA", "KIOCL", "HLEGLAS", "ORIENTCEM", "SHYAMMETL",
        ],
    ),
    (
        Sector::Energy,
        &[
            "RELIANCE", "ONGC", "BPCL", "IOC", "GAIL", "NTPC", "POWERGRID", "ADANIGREEN",
            "TATAPOWER", "ADANIPOWER", "NHPC", "SJVN", "TORNTPOWER", "CESC", "JSWENERGY",
            "PETRONET", "MGL", "IGL", "GUJGASLTD", "ATGL", "AEGISCHEM", "GSPL", "HPCL", "OIL",
            "MRPL", "CHENNPETRO", "IOCL", "CASTROLIND", "GULFOILLUB",
        ],
    ),
    (
        Sector::Realty,
        &[
            "DLF", "GODREJPROP", "OBEROIRLTY", "PRESTIGE", "PHOENIXLTD", "BRIGADE", "SOBHA",
            "SUNTECK", "MAHLIFE", "LODHA", "RAYMOND", "IBREALEST", "ANANTRAJ", "KOLTEPATIL",
            "ASHIANA", "ARVIND", "PURVA", "SIGACHI",
        ],
    ),
    (
        Sector::Telecom,
        &[
            "BHARTIARTL", "IDEA", "TATACOMM", "INDUSTOWER", "STLTECH", "HFCL", "TEJAS", "GTPL",
            "NAZARA", "SANSERA", "RAILTEL",
        ],
    ),
    (
        Sector::Infrastructure,
        &[
            "LT", "ADANIENT", "ADANIPORTS", "ULTRACEMCO", "GRASIM", "SHREECEM", "AMBUJACEM",
            "ACC", "DALBHARAT", "RAMCOCEM", "JKCEMENT", "JKPAPER", "IRCON", "RVNL", "NBCC",
            "NCC", "KEC", "KALPATPOWR", "THERMAX", "BEL", "HAL", "BHEL", "SIEMENS", "ABB",
            "CGPOWER", "CUMMINSIND", "GRINDWELL", "CARBORUNIV", "BLUESTARCO", "VOLTAS",
            "HAVELLS", "POLYCAB", "FINOLEX", "KEI", "AIAENG",
        ],
    ),
    (
        Sector::Chemicals,
        &[
            "PIDILITIND", "SRF", "AARTI", "ATUL", "DEEPAKNI", "NAVINFLUOR", "FINEORG", "CLEAN",
            "FLUOROCHEM", "TATACHEM", "ALKYLAMINE", "GALAXYSURF", "VINATIORG", "LXCHEM",
            "NEOGEN", "NOCIL", "PHILIPCARB", "SUDARSCHEM", "BASF", "BALAMINES",
        ],
    ),
    (
        Sector::Financials,
        &[
            "BAJFINANCE", "BAJAJFINSV", "HDFCAMC", "SBILIFE", "HDFCLIFE", "ICICIPRULI",
            "MUTHOOTFIN", "CHOLAFIN", "SHRIRAMFIN", "MANAPPURAM", "L_TFH", "M_MFIN", "IIFL",
            "POONAWALLA", "LICHSGFIN", "CANFINHOME", "HOMEFIRST", "AAVAS", "APTUS", "CREDITACC",
            "FUSION", "ANGELONE", "MOTILALOFS", "ICICIGI", "STARHEALTH", "NAM_INDIA", "UTIAMC",
            "CAMS", "BSE", "CDSL", "MCX",
        ],
    ),
    (
        Sector::Insurance,
        &[
            "LICI", "BAJAJHLDNG", "NIACL", "GICRE",
        ],
    ),
    (
        Sector::Cement,
        &[
            "BIRLACORPN", "JKLAKSHMI", "HEIDELBERG", "INDIACEM", "PRISMCEM", "SAGCEM",
            "STARCEM", "NCLIND", "SANGAMIND", "KESORAMIND",
        ],
    ),
    (
        Sector::ConsumerDurables,
        &[
            "TITAN", "CROMPTON", "WHIRLPOOL", "SYMPHONY", "VGUARD", "ORIENTELEC", "RAJESHEXPO",
            "BATAINDIA", "RELAXO", "METROBRAND", "PAGEIND", "KAJARIACER", "CERA", "SOMERSETHO",
            "AMBER", "DIXON", "KAYNES",
        ],
    ),
    (
        Sector::Aviation,
        &[
            "INDIGO", "SPICEJET", "AIRINDIA", "GMRAIRPORT",
        ],
    ),
    (
        Sector::Hospitality,
        &[
            "INDHOTEL", "EIHOTEL", "LEMONTREE", "CHALET", "TAJGVK", "IHLHOME",
        ],
    ),
    (
        Sector::Media,
        &[
            "ZEEL", "PVRINOX", "SUNTV", "TV18BRDCST", "NETWORK18", "INOXLEISUR", "SAREGAMA",
            "TIPS", "NAVNETEDUL",
        ],
    ),
    (
        Sector::Textiles,
        &[
            "TRIDENT", "PGHL", "WELSPUNIND", "VARDHMAN", "KPR", "LUXIND", "LAXMIMACH", "GOKEX",
            "HIMATSEIDE", "NITINSPINNER", "SPANDANA", "BSLLTD", "DOLLAR",
        ],
    ),
];

/// Exchange symbols with punctuation mapped to their table keys.
pub const SYMBOL_ALIASES: &[(&str, &str)] = &[
    ("M&M", "M_M"),
    ("BAJAJ-AUTO", "BAJAJ_AUTO"),
    ("L&TFH", "L_TFH"),
    ("M&MFIN", "M_MFIN"),
    ("MCDOWELL-N", "MCDOWELL_N"),
    ("J&KBANK", "J_KBANK"),
    ("NAM-INDIA", "NAM_INDIA"),
];
